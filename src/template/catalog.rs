//! Fixed catalogs feeding the deterministic synthesizer.

/// The four guidelines appended to every generated template.
pub const DEFAULT_GUIDELINES: &[&str] = &[
    "Avoid language that might seem judgmental or dismissive.",
    "Be inclusive in your examples and explanations, consider multiple perspectives, and avoid stereotypes.",
    "Provide clear and concise responses.",
    "If off-topic, prompt users to return to the main subject.",
];

/// Structure rules every template's conversation section carries.
pub const CONVERSATION_STRUCTURE: &[&str] = &[
    "Structure responses with headers and bullet points for easy scanning",
    "Always reference relevant knowledge base materials when available",
    "Provide examples that relate to the user's specific context",
    "Ask one clarifying question at a time to avoid overwhelming users",
];

pub const MODEL_HIGH: &str = "Claude 4 Opus";
pub const MODEL_MEDIUM: &str = "Claude 3.7 Sonnet";
pub const MODEL_SIMPLE: &str = "Claude 3.5 Haiku";
pub const MODEL_REASONING: &str = "Claude 4 Sonnet (Reasoning)";

/// What each recommendable model is best at, for the rendered summary line.
pub fn model_best_for(model: &str) -> Option<&'static [&'static str]> {
    match model {
        "Claude 4 Opus" => Some(&["complex workflows", "detailed analysis", "research"]),
        "Claude 3.7 Sonnet" => Some(&["general purpose", "balanced performance", "education"]),
        "Claude 3.5 Haiku" => Some(&["quick responses", "simple tasks", "high volume"]),
        "Claude 4 Sonnet (Reasoning)" => {
            Some(&["problem solving", "step-by-step analysis", "math"])
        }
        _ => None,
    }
}

/// Knowledge file categories, keyed by the keywords that trigger them.
pub const KNOWLEDGE_FILE_KEYWORDS: &[(&str, &[&str])] = &[
    ("PDF documents", &["curriculum", "standards", "policy", "handbook", "guide"]),
    ("CSV/Excel files", &["data", "student records", "assessment", "grades", "roster"]),
    ("Word documents", &["lesson plan", "template", "report", "notes"]),
    ("PowerPoint presentations", &["training", "presentation", "slides"]),
];

pub const DEFAULT_KNOWLEDGE_FILE: &str = "PDF documents (general reference materials)";

pub const USER_MEMORY_FIELDS: &[&str] = &[
    "Grade Level or context",
    "Subject Area",
    "User Role",
    "Previous interactions",
    "User preferences",
];

pub const COMPLEX_KEYWORDS: &[&str] = &[
    "analyze",
    "evaluate",
    "synthesize",
    "compare",
    "integrate",
    "assess",
    "multi-step",
];

pub const SIMPLE_KEYWORDS: &[&str] = &["quick", "simple", "basic", "generate", "create"];

/// Words marking a transition between workflow steps.
pub const STEP_TRANSITIONS: &[&str] = &["step", "then", "next", "after", "finally"];
