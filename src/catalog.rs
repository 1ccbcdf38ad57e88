//! The fixed five-question interview catalog.
//!
//! Question order, ids, and wording are part of the client contract; the
//! voice prompts are phrased for speech synthesis, so they carry no
//! punctuation that a TTS engine would stumble over.

/// One interview question.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    /// Stable id carried on the wire and stored with each answer
    pub id: &'static str,
    /// 1-based position, for display
    pub order: usize,
    /// On-screen wording
    pub text: &'static str,
    /// Spoken wording, fed to TTS
    pub voice_prompt: &'static str,
    /// Words a good answer is expected to contain
    pub extraction_hints: &'static [&'static str],
}

pub const INTERVIEW_QUESTIONS: &[Question] = &[
    Question {
        id: "q1_app_vision",
        order: 1,
        text: "Tell me about the app you're envisioning. What problem does it solve, and who is it for?",
        voice_prompt: "Hi Im here to help you build a custom AI assistant Lets start Tell me about the app youre envisioning What problem does it solve and who is it for?",
        extraction_hints: &["app", "problem", "solve", "user", "audience", "helps", "for"],
    },
    Question {
        id: "q2_user_journey",
        order: 2,
        text: "Describe a typical user's journey through the app. What does their experience look like from start to finish?",
        voice_prompt: "Great Now describe a typical users journey through the app What does their experience look like from start to finish?",
        extraction_hints: &["journey", "experience", "start", "finish", "first", "then", "next", "finally"],
    },
    Question {
        id: "q3_tone_personality",
        order: 3,
        text: "What tone, personality, or expertise should the app convey? How should it make users feel?",
        voice_prompt: "Perfect What tone personality or expertise should the app convey How should it make users feel?",
        extraction_hints: &[
            "tone",
            "personality",
            "expertise",
            "feel",
            "friendly",
            "professional",
            "casual",
            "formal",
            "supportive",
            "empathetic",
        ],
    },
    Question {
        id: "q4_success_outcome",
        order: 4,
        text: "What would success look like for this app? If users walked away having accomplished one thing, what would it be?",
        voice_prompt: "Excellent What would success look like for this app If users walked away having accomplished one thing what would it be?",
        extraction_hints: &["success", "accomplish", "achieve", "goal", "outcome", "result"],
    },
    Question {
        id: "q5_boundaries",
        order: 5,
        text: "Are there any boundaries or things the app should avoid doing or suggesting?",
        voice_prompt: "Finally are there any boundaries or things the app should avoid doing or suggesting?",
        extraction_hints: &["boundaries", "avoid", "not", "dont", "shouldnt", "never", "restrict", "limit"],
    },
];

pub const WELCOME_MESSAGE: &str = "Welcome to Voice Builder for Playlab I will ask you 5 questions to help design your custom AI assistant This should take about 3 minutes Ready to begin";

pub const COMPLETION_MESSAGE: &str = "Great I have all the information I need Let me generate your custom AI assistant template for Playlab This will just take a moment";

pub fn question_count() -> usize {
    INTERVIEW_QUESTIONS.len()
}

/// Look up a question by its 0-based index.
pub fn question(index: usize) -> Option<&'static Question> {
    INTERVIEW_QUESTIONS.get(index)
}
