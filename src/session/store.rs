use super::types::{Answer, InterviewState, Progress, Session};
use crate::catalog::{self, Question};
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The caller must restart the interview; the id is gone or never existed
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("question index {0} is outside the catalog")]
    InvalidQuestion(usize),
}

/// In-memory store of interview sessions, keyed by session id.
///
/// Cloning is cheap; all clones share the same map. Mutations for a given
/// session arrive sequentially from its own connection, but the map itself is
/// safe for concurrent access across sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    total_questions: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            total_questions: catalog::question_count(),
        }
    }

    /// Allocate a new session in the `Welcome` state.
    pub async fn create_session(&self) -> Session {
        let session = Session::new(uuid::Uuid::new_v4().to_string());

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id.clone(), session.clone());
        info!("Created session: {}", session.session_id);

        session
    }

    /// Transition `Welcome` -> `Questioning` at question 0.
    pub async fn start_interview(&self, session_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        session.state = InterviewState::Questioning;
        session.current_question_index = 0;
        info!("Started interview for session: {}", session_id);

        Ok(())
    }

    /// The question the session is currently on.
    pub async fn current_question(&self, session_id: &str) -> Result<&'static Question, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        catalog::question(session.current_question_index)
            .ok_or(SessionError::InvalidQuestion(session.current_question_index))
    }

    /// Record (or overwrite) the answer for a question index.
    ///
    /// Pure side effect; never transitions state. Confidence defaults to 1.0,
    /// the value for typed or explicitly confirmed text.
    pub async fn save_response(
        &self,
        session_id: &str,
        question_index: usize,
        transcript: &str,
        confidence: Option<f32>,
    ) -> Result<(), SessionError> {
        let question =
            catalog::question(question_index).ok_or(SessionError::InvalidQuestion(question_index))?;

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        let answer = Answer {
            question_id: question.id.to_string(),
            raw_transcript: transcript.to_string(),
            confirmed_answer: transcript.to_string(),
            confidence: confidence.unwrap_or(1.0),
            timestamp: Utc::now(),
        };

        session.responses.insert(question_index, answer);
        info!(
            "Saved response for Q{} ({}): {:.50}",
            question_index + 1,
            session_id,
            transcript
        );

        Ok(())
    }

    /// Move to the next question. Returns `false` exactly once during the
    /// question walk, when the last question has been answered; the session
    /// then enters `Generating` with its end time stamped.
    ///
    /// Once the walk is over, further calls are no-ops that keep returning
    /// `false`: a repeated final answer is a generation retry, not another
    /// step, so the index and end time are left untouched.
    pub async fn advance(&self, session_id: &str) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        match session.state {
            InterviewState::Generating | InterviewState::Complete | InterviewState::Error => {
                return Ok(false)
            }
            _ => {}
        }

        session.current_question_index += 1;

        if session.current_question_index >= self.total_questions {
            session.state = InterviewState::Generating;
            session.end_time = Some(Utc::now());
            info!("All questions answered for session: {}", session_id);
            return Ok(false);
        }

        session.state = InterviewState::Questioning;
        info!(
            "Session {} moved to question {}",
            session_id,
            session.current_question_index + 1
        );

        Ok(true)
    }

    /// Progress for display: 1-based current question, clamped to the total.
    pub async fn progress(&self, session_id: &str) -> Result<Progress, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        Ok(Progress {
            current: (session.current_question_index + 1).min(self.total_questions),
            total: self.total_questions,
        })
    }

    /// All recorded answers in question order. Used once, at completion, to
    /// feed the template synthesizer.
    pub async fn all_responses(&self, session_id: &str) -> Result<Vec<(usize, Answer)>, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        Ok(session
            .responses
            .iter()
            .map(|(index, answer)| (*index, answer.clone()))
            .collect())
    }

    /// Mark the template as delivered.
    pub async fn mark_complete(&self, session_id: &str) -> Result<(), SessionError> {
        self.set_state(session_id, InterviewState::Complete).await
    }

    /// Move the session into the absorbing `Error` state.
    pub async fn mark_failed(&self, session_id: &str) -> Result<(), SessionError> {
        self.set_state(session_id, InterviewState::Error).await
    }

    async fn set_state(&self, session_id: &str, state: InterviewState) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        session.state = state;
        Ok(())
    }

    /// Remove a session. Idempotent.
    pub async fn delete_session(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_some() {
            info!("Deleted session: {}", session_id);
        }
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// A point-in-time copy of a session, for status queries and tests.
    pub async fn snapshot(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Evict every session whose start time is older than `max_age`.
    /// Returns the number of sessions removed.
    pub async fn sweep_expired(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(max_age).unwrap_or_else(|_| ChronoDuration::hours(1));

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.start_time >= cutoff);
        let removed = before - sessions.len();

        if removed > 0 {
            warn!("Swept {} expired session(s)", removed);
        }

        removed
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
