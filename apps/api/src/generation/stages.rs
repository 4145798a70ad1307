//! The five pipeline stages.
//!
//! Each stage makes exactly one `TextGenerator` call. Its context builder is its
//! read-set; the `StateUpdate` variant it returns is its write-set.

use serde_json::Value;
use tracing::debug;

use crate::generation::capability::{GenerationError, PromptContext, TextGenerator};
use crate::generation::extract::{extract, Record};
use crate::generation::prompts;
use crate::generation::review::{review_round, BestTracking};
use crate::generation::state::{Critique, StateUpdate, WorkflowState};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;

/// Serializes an optional record, `{}` when the producing stage has not run.
fn record_json(record: &Option<Record>) -> Result<String, GenerationError> {
    let json = match record {
        Some(record) => serde_json::to_string_pretty(record)?,
        None => serde_json::to_string_pretty(&Value::Object(Record::new()))?,
    };
    Ok(json)
}

// ────────────────────────────────────────────────────────────────────────────
// Read-sets
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn analyze_context(state: &WorkflowState) -> PromptContext {
    PromptContext::new().with("job_description", state.job_description.as_str())
}

pub(crate) fn map_context(state: &WorkflowState) -> Result<PromptContext, GenerationError> {
    PromptContext::new()
        .with("job_description", state.job_description.as_str())
        .with("target_persona_json", record_json(&state.target_persona)?)
        .with_json("profile_json", &state.profile)
}

/// Shared by both drafting stages.
pub(crate) fn draft_context(state: &WorkflowState) -> Result<PromptContext, GenerationError> {
    PromptContext::new()
        .with("grounding_instruction", GROUNDING_INSTRUCTION)
        .with("job_description", state.job_description.as_str())
        .with("target_persona_json", record_json(&state.target_persona)?)
        .with("requirement_map_json", record_json(&state.requirement_map)?)
        .with("reviewer_instructions", state.reviewer_instructions.as_str())
        .with_json("profile_json", &state.profile)
}

pub(crate) fn critique_context(state: &WorkflowState) -> Result<PromptContext, GenerationError> {
    Ok(PromptContext::new()
        .with("job_description", state.job_description.as_str())
        .with("target_persona_json", record_json(&state.target_persona)?)
        .with("requirement_map_json", record_json(&state.requirement_map)?)
        .with("resume_artifact", state.resume_artifact.as_str())
        .with("cover_letter_artifact", state.cover_letter_artifact.as_str()))
}

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

pub async fn analyze_requirements(
    generator: &dyn TextGenerator,
    state: &WorkflowState,
) -> Result<StateUpdate, GenerationError> {
    let output = generator
        .generate(&prompts::ANALYZE, &analyze_context(state))
        .await?;
    let persona = extract(&output);
    let persona_json = Value::Object(persona.clone());
    debug!("Target persona: {persona_json}");
    Ok(StateUpdate::TargetPersona(persona))
}

pub async fn map_evidence(
    generator: &dyn TextGenerator,
    state: &WorkflowState,
) -> Result<StateUpdate, GenerationError> {
    let output = generator
        .generate(&prompts::MAP, &map_context(state)?)
        .await?;
    let requirement_map = extract(&output);
    let map_json = Value::Object(requirement_map.clone());
    debug!("Requirement map: {map_json}");
    Ok(StateUpdate::RequirementMap(requirement_map))
}

pub async fn draft_resume(
    generator: &dyn TextGenerator,
    state: &WorkflowState,
) -> Result<StateUpdate, GenerationError> {
    let resume = generator
        .generate(&prompts::RESUME, &draft_context(state)?)
        .await?;
    Ok(StateUpdate::Resume(resume))
}

pub async fn draft_cover_letter(
    generator: &dyn TextGenerator,
    state: &WorkflowState,
) -> Result<StateUpdate, GenerationError> {
    let letter = generator
        .generate(&prompts::COVER_LETTER, &draft_context(state)?)
        .await?;
    Ok(StateUpdate::CoverLetter(letter))
}

/// Scores the current drafts and folds the result into the round state.
pub async fn critique(
    generator: &dyn TextGenerator,
    state: &WorkflowState,
    policy: BestTracking,
) -> Result<StateUpdate, GenerationError> {
    let output = generator
        .generate(&prompts::CRITIQUE, &critique_context(state)?)
        .await?;
    let critique = Critique::parse(&output);
    debug!("Critique: {critique:?}");
    Ok(StateUpdate::Review(review_round(state, critique, policy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::capability::render_template;
    use crate::generation::state::BestCandidate;
    use crate::generation::testing::{Reply, ScriptedGenerator};
    use serde_json::json;

    fn sample_state() -> WorkflowState {
        let mut state = WorkflowState::new(
            "Senior Rust Engineer. Must know tokio and Postgres.",
            json!({"contact": {"name": "Ada"}, "skills": {"languages": ["Rust"]}}),
        );
        state.target_persona = Some(extract(r#"{"persona": "Backend builder"}"#));
        state.requirement_map = Some(extract(r#"{"requirement_map": []}"#));
        state.resume_artifact = "## Summary\nRust engineer".into();
        state.cover_letter_artifact = "Hello,\nI build things.".into();
        state
    }

    #[test]
    fn test_every_template_renders_with_its_context() {
        let state = sample_state();
        let cases = [
            (prompts::ANALYZE, analyze_context(&state)),
            (prompts::MAP, map_context(&state).unwrap()),
            (prompts::RESUME, draft_context(&state).unwrap()),
            (prompts::COVER_LETTER, draft_context(&state).unwrap()),
            (prompts::CRITIQUE, critique_context(&state).unwrap()),
        ];
        for (instructions, ctx) in cases {
            let rendered = render_template(instructions.template, &ctx).unwrap();
            assert!(rendered.contains("Senior Rust Engineer"));
        }
    }

    #[test]
    fn test_read_sets() {
        let state = sample_state();
        let keys = |ctx: PromptContext| ctx.keys().collect::<Vec<_>>();

        assert_eq!(keys(analyze_context(&state)), ["job_description"]);
        assert_eq!(
            keys(map_context(&state).unwrap()),
            ["job_description", "profile_json", "target_persona_json"]
        );
        assert_eq!(
            keys(draft_context(&state).unwrap()),
            [
                "grounding_instruction",
                "job_description",
                "profile_json",
                "requirement_map_json",
                "reviewer_instructions",
                "target_persona_json"
            ]
        );
        assert_eq!(
            keys(critique_context(&state).unwrap()),
            [
                "cover_letter_artifact",
                "job_description",
                "requirement_map_json",
                "resume_artifact",
                "target_persona_json"
            ]
        );
    }

    #[test]
    fn test_missing_records_serialize_as_empty_object() {
        let state = WorkflowState::new("JD", json!({}));
        let ctx = draft_context(&state).unwrap();
        assert_eq!(ctx.get("target_persona_json"), Some("{}"));
        assert_eq!(ctx.get("requirement_map_json"), Some("{}"));
        assert_eq!(ctx.get("reviewer_instructions"), Some(""));
    }

    #[tokio::test]
    async fn test_analyze_parses_fenced_output() {
        let generator = ScriptedGenerator::new(vec![Reply::text(
            "```json\n{\"persona\": \"Platform engineer\", \"keywords\": [\"Rust\"]}\n```",
        )]);
        let update = analyze_requirements(&generator, &sample_state()).await.unwrap();
        assert_eq!(
            update,
            StateUpdate::TargetPersona(extract(r#"{"persona": "Platform engineer", "keywords": ["Rust"]}"#))
        );
    }

    #[tokio::test]
    async fn test_map_evidence_keeps_prose_as_raw() {
        let generator = ScriptedGenerator::new(vec![Reply::text("I cannot map this.")]);
        let update = map_evidence(&generator, &sample_state()).await.unwrap();
        let StateUpdate::RequirementMap(map) = update else {
            panic!("expected requirement map");
        };
        assert_eq!(map.get("raw"), Some(&json!("I cannot map this.")));
    }

    #[tokio::test]
    async fn test_drafts_are_not_parsed() {
        let generator = ScriptedGenerator::new(vec![
            Reply::text("```\n## Summary\n```"),
            Reply::text("{\"not\": \"parsed\"}"),
        ]);
        let state = sample_state();
        assert_eq!(
            draft_resume(&generator, &state).await.unwrap(),
            StateUpdate::Resume("```\n## Summary\n```".into())
        );
        assert_eq!(
            draft_cover_letter(&generator, &state).await.unwrap(),
            StateUpdate::CoverLetter("{\"not\": \"parsed\"}".into())
        );
    }

    #[tokio::test]
    async fn test_drafts_see_reviewer_instructions() {
        let generator = ScriptedGenerator::new(vec![Reply::text("resume")]);
        let mut state = sample_state();
        state.reviewer_instructions = "Mention Kafka from the 2022 project".into();
        draft_resume(&generator, &state).await.unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Mention Kafka from the 2022 project"));
    }

    #[tokio::test]
    async fn test_critique_first_round_seeds_best() {
        let generator = ScriptedGenerator::new(vec![Reply::text(
            r#"{"match_score": 77, "issues": ["no metrics"], "revision_instructions": "Add numbers"}"#,
        )]);
        let state = sample_state();
        let StateUpdate::Review(review) = critique(&generator, &state, BestTracking::default())
            .await
            .unwrap()
        else {
            panic!("expected review update");
        };

        assert_eq!(review.review_round, 1);
        assert_eq!(review.match_score, 77);
        assert_eq!(review.critique.revision_instructions(), "Add numbers");
        assert_eq!(
            review.best,
            Some(BestCandidate {
                resume: state.resume_artifact.clone(),
                cover_letter: state.cover_letter_artifact.clone(),
                match_score: 77,
            })
        );
        assert!(review.restore.is_none());
    }

    #[tokio::test]
    async fn test_list_instructions_reach_reviewer_notes() {
        let generator = ScriptedGenerator::new(vec![Reply::text(
            r#"{"match_score": 60, "issues": [], "revision_instructions": ["Add Kafka", "Quantify impact"]}"#,
        )]);
        let mut state = sample_state();
        let update = critique(&generator, &state, BestTracking::default())
            .await
            .unwrap();
        state.apply(update);

        assert_eq!(state.reviewer_instructions, "Add Kafka\nQuantify impact");
        let ctx = draft_context(&state).unwrap();
        assert_eq!(ctx.get("reviewer_instructions"), Some("Add Kafka\nQuantify impact"));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let generator = ScriptedGenerator::new(vec![Reply::fail("quota exhausted")]);
        let err = critique(&generator, &sample_state(), BestTracking::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
    }
}
