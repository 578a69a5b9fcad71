//! Headline rank crate - delivery selection and the end-to-end pipeline.
//!
//! The `Ranker` turns a scored candidate set into a short, source-diverse
//! list that never repeats what was already delivered. The `Pipeline` wires
//! document sources, the relevance scorer and the ranker into one run with
//! per-stage time budgets.

pub mod pipeline;
pub mod ranker;
pub mod sources;

pub use pipeline::Pipeline;
pub use ranker::Ranker;
pub use sources::{DocumentSource, JsonFileSource};
