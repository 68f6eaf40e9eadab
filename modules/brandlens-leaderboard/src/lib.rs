//! Competitive leaderboard computation for LLM visibility fingerprints.
//!
//! A pure, synchronous pipeline: raw LLM answer texts go in, a ranked
//! leaderboard of the target business against its extracted competitors
//! comes out. Four stages, each a pure function of its input:
//!
//! 1. [`extractor`] — pull name-like mentions out of recommendation text
//! 2. [`validator`] — reject prose fragments misextracted as names
//! 3. [`dedup`] — merge surface-form variants of the same business
//! 4. [`aggregator`] — market shares, ranks, and insights
//!
//! [`pipeline::build_leaderboard`] composes all four.

pub mod aggregator;
pub mod dedup;
pub mod extractor;
pub mod pipeline;
pub mod validator;

pub use pipeline::{build_leaderboard, PipelineStats};
pub use validator::{NameValidator, RejectReason};
