//! Template synthesis
//!
//! Turns the five confirmed interview answers into a structured system-prompt
//! template. Two strategies exist: the deterministic extractor (pure, default)
//! and delegation to an external generative writer. A generative failure is a
//! synthesis failure, never a silent fall-through to the deterministic path.

mod catalog;
mod synthesizer;
mod types;
mod writer;

pub use synthesizer::{render_markdown, synthesize};
pub use types::{
    Background, Complexity, ConversationRules, Guidelines, Recommendations, StarterInput,
    StarterInputType, Template, UserMemory, Workflow, WorkflowStep,
};
pub use writer::{SynthesisError, TemplateWriter};

pub const ANSWER_COUNT: usize = 5;

/// Which synthesizer strategy the process runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStrategy {
    Deterministic,
    Generative,
}

impl TemplateStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "deterministic" => Some(TemplateStrategy::Deterministic),
            "generative" => Some(TemplateStrategy::Generative),
            _ => None,
        }
    }
}
