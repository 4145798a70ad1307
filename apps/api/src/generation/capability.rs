//! Generation capability — the only door the pipeline has to a text model.
//!
//! Stages never talk to an LLM directly. They hand a `RoleInstructions` pair and a
//! `PromptContext` to whatever `TextGenerator` the orchestrator was built with.
//! Production wires in `llm_client::LlmClient`; tests wire in a scripted stub.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Prompt template references unknown variable '{0}'")]
    MissingVariable(String),

    #[error("Failed to serialize prompt context: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Role-specific instructions for one stage: a system prompt plus a `{name}` template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInstructions {
    pub system: &'static str,
    pub template: &'static str,
}

/// Named text values substituted into a role template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    values: BTreeMap<&'static str, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Inserts `value` as pretty-printed JSON.
    pub fn with_json<T: Serialize + ?Sized>(
        self,
        key: &'static str,
        value: &T,
    ) -> Result<Self, GenerationError> {
        let json = serde_json::to_string_pretty(value)?;
        Ok(self.with(key, json))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

/// The text generation capability injected into the orchestrator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        instructions: &RoleInstructions,
        context: &PromptContext,
    ) -> Result<String, GenerationError>;
}

/// Fills every `{name}` placeholder in `template` from `context` in a single pass.
///
/// Substituted values are never rescanned, so a job description containing `{foo}`
/// is passed through verbatim. Braces that do not enclose a bare lowercase
/// identifier (JSON examples in prompts) are left alone.
pub fn render_template(template: &str, context: &PromptContext) -> Result<String, GenerationError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match placeholder_name(after) {
            Some(name) => {
                let value = context
                    .get(name)
                    .ok_or_else(|| GenerationError::MissingVariable(name.to_string()))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Returns the identifier if `text` starts with `ident}`.
fn placeholder_name(text: &str) -> Option<&str> {
    let end = text.find('}')?;
    let name = &text[..end];
    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_lowercase() {
        return None;
    }
    if chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        Some(name)
    } else {
        None
    }
}
