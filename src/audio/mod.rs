//! Audio chunk aggregation
//!
//! Buffers streamed audio per session and decides when a segment is ready for
//! transcription, decoupling client upload cadence from provider call rate.

mod aggregator;

pub use aggregator::ChunkAggregator;
