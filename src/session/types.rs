use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interview lifecycle states.
///
/// `Error` is absorbing: a session only enters it on unrecoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    Welcome,
    Questioning,
    Generating,
    Complete,
    Error,
}

/// A recorded answer to one interview question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Catalog id of the question this answers
    pub question_id: String,

    /// The transcript as first received (may have been interim)
    pub raw_transcript: String,

    /// The text the user explicitly confirmed; authoritative for synthesis
    pub confirmed_answer: String,

    /// Transcription trust in [0, 1]; 1.0 for typed or user-confirmed text
    pub confidence: f32,

    /// When the answer was saved
    pub timestamp: DateTime<Utc>,
}

/// One user's run through the interview.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: String,
    pub state: InterviewState,

    /// 0-based index of the question currently being asked
    pub current_question_index: usize,

    /// Answers keyed by 0-based question index, insertion order = question order
    pub responses: BTreeMap<usize, Answer>,

    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            state: InterviewState::Welcome,
            current_question_index: 0,
            responses: BTreeMap::new(),
            start_time: Utc::now(),
            end_time: None,
        }
    }
}

/// Interview progress for display (1-based current question).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}
