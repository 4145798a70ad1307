//! Scripted `TextGenerator` for tests: replays canned replies in order and
//! records every rendered prompt.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::generation::capability::{
    render_template, GenerationError, PromptContext, RoleInstructions, TextGenerator,
};
use crate::llm_client::LlmError;

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Reply::Fail(message.into())
    }

    /// A critique object with the given score.
    pub fn critique(score: u8, instructions: &str) -> Self {
        Reply::Text(
            serde_json::json!({
                "match_score": score,
                "issues": [],
                "revision_instructions": instructions,
            })
            .to_string(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: &'static str,
    pub prompt: String,
}

#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        instructions: &RoleInstructions,
        context: &PromptContext,
    ) -> Result<String, GenerationError> {
        let prompt = render_template(instructions.template, context)?;
        self.calls.lock().unwrap().push(RecordedCall {
            system: instructions.system,
            prompt,
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(LlmError::Api {
                status: 503,
                message,
            }
            .into()),
            None => panic!("script exhausted: no reply left for {}", instructions.system),
        }
    }
}
