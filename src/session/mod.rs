//! Interview session management
//!
//! This module provides the session store and interview state machine:
//! - Per-session lifecycle (welcome -> questioning -> generating -> complete)
//! - Answer collection with overwrite semantics
//! - TTL-based eviction of idle sessions

mod store;
mod types;

pub use store::{SessionError, SessionStore};
pub use types::{Answer, InterviewState, Progress, Session};
