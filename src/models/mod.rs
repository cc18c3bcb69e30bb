//! # Embedding Models
//!
//! The extractor seam, the ONNX image encoder behind it, and the
//! process-wide single-flight cache that owns it.

pub mod cache;
pub mod vision;

use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;

use crate::core::Embedding;

pub use cache::EmbeddingCache;
pub use vision::VisionModel;

/// Turns one image into a fixed-length embedding.
///
/// Implementations are shared across threads once constructed.
pub trait Extractor: Send + Sync {
	fn extract(&self, path: &Path) -> Result<Embedding>;
}

static SHARED_VISION: OnceLock<EmbeddingCache<VisionModel>> = OnceLock::new();

/// Process-lifetime cache holding the configured vision model
pub fn shared_vision() -> &'static EmbeddingCache<VisionModel> {
	SHARED_VISION.get_or_init(|| EmbeddingCache::new(VisionModel::from_config))
}
