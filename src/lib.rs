//! # Burst Library
//!
//! Groups photos by visual similarity (CLIP embeddings clustered with
//! DBSCAN over cosine distance) and picks the best shot of each group
//! with an external quality scorer.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod runtime;
pub mod scoring;
pub mod ui;
pub mod validate;

pub use error::{Error, Result};
