//! Utils Module - Shared Infrastructure
//!
//! Constants, the in-memory session store and the funnel analytics
//! collector.

pub mod analytics;
pub mod constants;
pub mod session_store;

pub use analytics::*;
pub use constants::*;
pub use session_store::*;
