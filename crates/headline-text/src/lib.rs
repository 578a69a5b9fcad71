//! Headline text crate - normalization, lexical similarity and deduplication.
//!
//! Everything here is deterministic and lexical:
//! - Title normalization into significant keywords (English + Portuguese stop words)
//! - Jaccard and overlap coefficients over keyword sets
//! - Greedy best-of-cluster deduplication (early pass) and an order-preserving
//!   final pass with looser thresholds

pub mod dedup;
pub mod similarity;
pub mod tokenizer;

pub use dedup::{deduplicate_by_similarity, final_dedup};
pub use similarity::{are_similar, is_final_duplicate, jaccard, overlap, KeywordSet};
pub use tokenizer::{normalize, significant_words};
