//! Core Module - Quiz Business Logic
//!
//! Question bank, sequencer state machine and the heuristic risk
//! classifier. Everything here is synchronous, in-memory and scoped to a
//! single quiz session.

pub mod classifier;
pub mod question_bank;
pub mod sequencer;

pub use classifier::*;
pub use question_bank::*;
pub use sequencer::*;
