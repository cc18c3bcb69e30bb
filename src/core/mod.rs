//! Core domain types

pub mod cluster;
pub mod embedding;
pub mod photo;
pub mod pick;

pub use cluster::{ClusterAssignment, ClusterParams, GroupSimilarity, GroupStats, PhotoGroup};
pub use embedding::Embedding;
pub use photo::PhotoRef;
pub use pick::{BestPick, GroupPickOutcome, PhotoScore};
