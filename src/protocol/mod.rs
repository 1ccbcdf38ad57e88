//! Session protocol layer
//!
//! A persistent WebSocket per client drives the interview state machine:
//! - C->S: start, begin, answer, audio-chunk
//! - S->C: session-created, welcome, question, transcription,
//!   generating-template, completion, template-generated, error
//!
//! `Connection` holds the per-socket session pointer and is independent of
//! the transport, so the dispatch logic is testable without a socket.

mod handler;
mod messages;
mod routes;
mod state;

pub use handler::Connection;
pub use messages::{ClientEvent, ServerEvent};
pub use routes::create_router;
pub use state::AppState;
