//! Similarity-grouping pipeline stages

pub mod dbscan;
pub mod embed;
pub mod group;
pub mod pick;

pub use dbscan::Dbscan;
pub use embed::{embed_paths, EmbeddingResult};
pub use group::{group_embedded, group_photos, EmbeddingFailure, Grouping};
pub use pick::{pick_best, pick_groups};
