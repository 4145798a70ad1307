// Application package generation: a refinement pipeline that drafts a tailored
// resume and cover letter, critiques them, and revises at most once.
// All model calls go through a `TextGenerator` injected at startup.

pub mod capability;
pub mod extract;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod review;
pub mod stages;
pub mod state;
#[cfg(test)]
pub mod testing;
