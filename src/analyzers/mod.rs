//! Classification, weighted aggregation and cross-run comparison.
//!
//! Records decoded from a stats export are split into read and write
//! operations, each group is reduced to a request-weighted summary, and
//! summaries from several runs are lined up for comparison.

pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod compare;
pub mod types;
pub mod utility;
