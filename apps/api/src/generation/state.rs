//! WorkflowState — the record threaded through one orchestration run.
//!
//! Stages never mutate the state directly. Each returns a `StateUpdate` whose
//! variant is that stage's write-set, and the orchestrator merges it with `apply`.

use serde_json::Value;

use crate::generation::extract::{try_extract, Record};

/// Highest score a critique may assign.
pub const MAX_MATCH_SCORE: u8 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Critique
// ────────────────────────────────────────────────────────────────────────────

/// Output of the critique stage.
///
/// `Unparsed` is what a critique that never decoded into an object looks like.
/// It scores 0: a malformed review is a hard fail, never a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Critique {
    WellFormed {
        match_score: u8,
        issues: Vec<String>,
        revision_instructions: String,
    },
    Unparsed {
        raw: String,
    },
}

impl Critique {
    /// Parses the critic's output. Text with no decodable object is `Unparsed`
    /// and keeps the full output.
    pub fn parse(output: &str) -> Self {
        match try_extract(output) {
            Some(record) => Self::from_record(record),
            None => Critique::Unparsed {
                raw: output.to_string(),
            },
        }
    }

    /// Interprets a decoded critique object. Missing or non-numeric `match_score`
    /// counts as 0 and missing `revision_instructions` as empty.
    pub fn from_record(record: Record) -> Self {
        let match_score = record.get("match_score").map(score_from_value).unwrap_or(0);

        let issues = match record.get("issues") {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            _ => Vec::new(),
        };

        // Critics often send a list of steps; keep one per line.
        let revision_instructions = match record.get("revision_instructions") {
            None | Some(Value::Null) => String::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(value_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Some(other) => value_text(other),
        };

        Critique::WellFormed {
            match_score,
            issues,
            revision_instructions,
        }
    }

    pub fn match_score(&self) -> u8 {
        match self {
            Critique::WellFormed { match_score, .. } => *match_score,
            Critique::Unparsed { .. } => 0,
        }
    }

    pub fn revision_instructions(&self) -> &str {
        match self {
            Critique::WellFormed {
                revision_instructions,
                ..
            } => revision_instructions,
            Critique::Unparsed { .. } => "",
        }
    }

    pub fn issues(&self) -> &[String] {
        match self {
            Critique::WellFormed { issues, .. } => issues,
            Critique::Unparsed { .. } => &[],
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts integers, floats and numeric strings; clamps into 0..=100.
fn score_from_value(value: &Value) -> u8 {
    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match numeric {
        Some(n) if n.is_finite() => n.round().clamp(0.0, MAX_MATCH_SCORE as f64) as u8,
        _ => 0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

/// Best-scoring artifacts observed so far in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestCandidate {
    pub resume: String,
    pub cover_letter: String,
    pub match_score: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub job_description: String,
    pub profile: Value,
    pub target_persona: Option<Record>,
    pub requirement_map: Option<Record>,
    pub reviewer_instructions: String,
    pub resume_artifact: String,
    pub cover_letter_artifact: String,
    pub match_score: u8,
    pub critique: Option<Critique>,
    pub review_round: u32,
    pub best: Option<BestCandidate>,
}

impl WorkflowState {
    pub fn new(job_description: impl Into<String>, profile: Value) -> Self {
        Self {
            job_description: job_description.into(),
            profile,
            target_persona: None,
            requirement_map: None,
            reviewer_instructions: String::new(),
            resume_artifact: String::new(),
            cover_letter_artifact: String::new(),
            match_score: 0,
            critique: None,
            review_round: 0,
            best: None,
        }
    }

    /// The current artifacts and score as a candidate.
    pub fn current_candidate(&self) -> BestCandidate {
        BestCandidate {
            resume: self.resume_artifact.clone(),
            cover_letter: self.cover_letter_artifact.clone(),
            match_score: self.match_score,
        }
    }

    pub fn apply(&mut self, update: StateUpdate) {
        match update {
            StateUpdate::TargetPersona(persona) => self.target_persona = Some(persona),
            StateUpdate::RequirementMap(map) => self.requirement_map = Some(map),
            StateUpdate::Resume(text) => self.resume_artifact = text,
            StateUpdate::CoverLetter(text) => self.cover_letter_artifact = text,
            StateUpdate::Review(review) => {
                self.reviewer_instructions = review.critique.revision_instructions().to_string();
                self.match_score = review.match_score;
                self.critique = Some(review.critique);
                self.review_round = review.review_round;

                if let Some(best) = review.best {
                    self.best = Some(best);
                }
                if let Some(restored) = review.restore {
                    self.resume_artifact = restored.resume;
                    self.cover_letter_artifact = restored.cover_letter;
                    self.match_score = restored.match_score;
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates
// ────────────────────────────────────────────────────────────────────────────

/// A stage's partial update. One variant per stage write-set.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    TargetPersona(Record),
    RequirementMap(Record),
    Resume(String),
    CoverLetter(String),
    Review(ReviewUpdate),
}

/// Everything the critique stage writes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub critique: Critique,
    /// Raw score of this round, before any regression guard correction.
    pub match_score: u8,
    pub review_round: u32,
    /// New best snapshot, when this round seeds or improves it.
    pub best: Option<BestCandidate>,
    /// Set when this round regressed: the current artifacts and score roll back to it.
    pub restore: Option<BestCandidate>,
}
