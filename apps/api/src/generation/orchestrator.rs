//! Refinement orchestrator — drives the stage graph for one application package.
//!
//! Graph:
//!
//! ```text
//! AnalyzeRequirements → MapEvidence → DraftResume → DraftCoverLetter → Critique
//!                                          ↑                               │
//!                                          └──── revise ───────────────────┤
//!                                                                          └─ done → Terminal
//! ```
//!
//! The only conditional edge leaves `Critique`: revise while the score is below
//! `REVISION_THRESHOLD` and fewer than `MAX_REVIEW_ROUNDS` critiques have run.
//! That cap bounds a run at 8 generator calls whatever the critic returns.
//!
//! The orchestrator holds no per-run data. Every `run` builds a fresh
//! `WorkflowState`, so one instance serves concurrent requests.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::capability::{GenerationError, TextGenerator};
use crate::generation::review::BestTracking;
use crate::generation::stages;
use crate::generation::state::{Critique, StateUpdate, WorkflowState};

/// Critique score at or above which the drafts are accepted without revision.
pub const REVISION_THRESHOLD: u8 = 90;

/// Hard cap on critique passes per run.
pub const MAX_REVIEW_ROUNDS: u32 = 2;

// ────────────────────────────────────────────────────────────────────────────
// Graph
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    AnalyzeRequirements,
    MapEvidence,
    DraftResume,
    DraftCoverLetter,
    Critique,
    Terminal,
}

impl Node {
    pub const ENTRY: Node = Node::AnalyzeRequirements;

    /// Transition table. `Critique` is the only node whose successor depends on state.
    pub fn next(self, state: &WorkflowState) -> Node {
        match self {
            Node::AnalyzeRequirements => Node::MapEvidence,
            Node::MapEvidence => Node::DraftResume,
            Node::DraftResume => Node::DraftCoverLetter,
            Node::DraftCoverLetter => Node::Critique,
            Node::Critique if should_revise(state) => Node::DraftResume,
            Node::Critique => Node::Terminal,
            Node::Terminal => Node::Terminal,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::AnalyzeRequirements => write!(f, "analyze_requirements"),
            Node::MapEvidence => write!(f, "map_evidence"),
            Node::DraftResume => write!(f, "draft_resume"),
            Node::DraftCoverLetter => write!(f, "draft_cover_letter"),
            Node::Critique => write!(f, "critique"),
            Node::Terminal => write!(f, "terminal"),
        }
    }
}

/// Routing predicate evaluated after each critique.
pub fn should_revise(state: &WorkflowState) -> bool {
    state.match_score < REVISION_THRESHOLD && state.review_round < MAX_REVIEW_ROUNDS
}

// ────────────────────────────────────────────────────────────────────────────
// Run result
// ────────────────────────────────────────────────────────────────────────────

/// What the caller gets back from a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutput {
    pub run_id: Uuid,
    pub resume: String,
    pub cover_letter: String,
    pub match_score: u8,
    pub review_rounds: u32,
    pub critique: Option<Critique>,
}

impl WorkflowOutput {
    fn from_state(run_id: Uuid, state: WorkflowState) -> Self {
        Self {
            run_id,
            resume: state.resume_artifact,
            cover_letter: state.cover_letter_artifact,
            match_score: state.match_score,
            review_rounds: state.review_round,
            critique: state.critique,
        }
    }
}

/// A generator failure that aborted a run, with the state as it stood.
#[derive(Debug, Error)]
#[error("run {run_id} failed at stage {stage}: {source}")]
pub struct WorkflowError {
    pub run_id: Uuid,
    pub stage: Node,
    pub state: Box<WorkflowState>,
    #[source]
    pub source: GenerationError,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    best_tracking: BestTracking,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            best_tracking: BestTracking::default(),
        }
    }

    pub fn with_best_tracking(mut self, best_tracking: BestTracking) -> Self {
        self.best_tracking = best_tracking;
        self
    }

    pub fn best_tracking(&self) -> BestTracking {
        self.best_tracking
    }

    /// Runs the pipeline to completion for one job description and profile.
    pub async fn run(
        &self,
        job_description: &str,
        profile: Value,
    ) -> Result<WorkflowOutput, WorkflowError> {
        let run_id = Uuid::new_v4();
        let mut state = WorkflowState::new(job_description, profile);
        let mut node = Node::ENTRY;

        info!("Run {run_id}: starting refinement pipeline");

        while node != Node::Terminal {
            info!(
                "Run {run_id}: running stage {node} (completed rounds: {})",
                state.review_round
            );

            let update = match self.execute(node, &state).await {
                Ok(update) => update,
                Err(source) => {
                    warn!("Run {run_id}: stage {node} failed: {source}");
                    return Err(WorkflowError {
                        run_id,
                        stage: node,
                        state: Box::new(state),
                        source,
                    });
                }
            };

            state.apply(update);

            if node == Node::Critique {
                info!(
                    "Run {run_id}: round {}/{MAX_REVIEW_ROUNDS} scored {} (threshold {REVISION_THRESHOLD})",
                    state.review_round, state.match_score
                );
            }

            node = node.next(&state);
        }

        info!(
            "Run {run_id}: finished after {} round(s) with score {}",
            state.review_round, state.match_score
        );

        Ok(WorkflowOutput::from_state(run_id, state))
    }

    async fn execute(
        &self,
        node: Node,
        state: &WorkflowState,
    ) -> Result<StateUpdate, GenerationError> {
        let generator = self.generator.as_ref();
        match node {
            Node::AnalyzeRequirements => stages::analyze_requirements(generator, state).await,
            Node::MapEvidence => stages::map_evidence(generator, state).await,
            Node::DraftResume => stages::draft_resume(generator, state).await,
            Node::DraftCoverLetter => stages::draft_cover_letter(generator, state).await,
            Node::Critique => stages::critique(generator, state, self.best_tracking).await,
            Node::Terminal => unreachable!("terminal node is never executed"),
        }
    }
}
