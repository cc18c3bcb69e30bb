//! Batch embedding with per-photo failure isolation

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::Embedding;
use crate::error::Result;
use crate::models::{EmbeddingCache, Extractor};
use crate::ui;

/// Embedding outcome for one input path
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
	pub path: PathBuf,
	pub outcome: std::result::Result<Embedding, String>,
}

impl EmbeddingResult {
	pub fn embedded(path: PathBuf, embedding: Embedding) -> Self {
		Self { path, outcome: Ok(embedding) }
	}

	pub fn failed(path: PathBuf, error: impl Into<String>) -> Self {
		Self { path, outcome: Err(error.into()) }
	}

	pub fn embedding(&self) -> Option<&Embedding> {
		self.outcome.as_ref().ok()
	}

	pub fn error(&self) -> Option<&str> {
		self.outcome.as_ref().err().map(String::as_str)
	}
}

/// Embed every path, in input order.
///
/// Only a failure to obtain the shared extractor fails the call; any
/// per-photo problem is recorded in that photo's result.
pub fn embed_paths<E: Extractor>(cache: &EmbeddingCache<E>, paths: &[PathBuf]) -> Result<Vec<EmbeddingResult>> {
	let extractor = cache.acquire()?;

	let results: Vec<EmbeddingResult> = paths
		.par_iter()
		.map(|path| embed_one(extractor.as_ref(), path))
		.collect();

	let failed = results.iter().filter(|r| r.outcome.is_err()).count();
	ui::debug(&format!("Embedded {} photos ({} failed)", results.len() - failed, failed));

	Ok(results)
}

fn embed_one<E: Extractor>(extractor: &E, path: &Path) -> EmbeddingResult {
	if !path.exists() {
		ui::debug(&format!("Not found: {}", path.display()));
		return EmbeddingResult::failed(path.to_path_buf(), "not found");
	}

	match extractor.extract(path) {
		Ok(embedding) => EmbeddingResult::embedded(path.to_path_buf(), embedding),
		Err(e) => {
			ui::debug(&format!("Embedding failed for {}: {:#}", path.display(), e));
			EmbeddingResult::failed(path.to_path_buf(), format!("{:#}", e))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::Error;
	use std::fs;

	/// Embeds the file's byte length; refuses files containing "corrupt"
	struct ByteLen;

	impl Extractor for ByteLen {
		fn extract(&self, path: &Path) -> anyhow::Result<Embedding> {
			let bytes = fs::read(path)?;
			if bytes.starts_with(b"corrupt") {
				anyhow::bail!("unsupported image format");
			}
			Ok(Embedding::raw(vec![bytes.len() as f32, 1.0]))
		}
	}

	#[test]
	fn every_path_yields_one_result_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let a = dir.path().join("a.jpg");
		let b = dir.path().join("b.jpg");
		let c = dir.path().join("c.jpg");
		fs::write(&a, b"aaaa").unwrap();
		fs::write(&b, b"corrupt").unwrap();
		fs::write(&c, b"cc").unwrap();
		let missing = dir.path().join("gone.jpg");

		let paths = vec![a.clone(), missing.clone(), b.clone(), c.clone(), a.clone()];
		let cache = EmbeddingCache::ready(ByteLen);
		let results = embed_paths(&cache, &paths).unwrap();

		assert_eq!(results.len(), paths.len());
		for (result, path) in results.iter().zip(&paths) {
			assert_eq!(&result.path, path);
		}
		assert_eq!(results[0].embedding().unwrap().as_slice(), &[4.0, 1.0]);
		assert_eq!(results[1].error(), Some("not found"));
		assert!(results[2].error().unwrap().contains("unsupported image format"));
		assert_eq!(results[3].embedding().unwrap().as_slice(), &[2.0, 1.0]);
		assert!(results[4].embedding().is_some());
	}

	#[test]
	fn extractor_construction_failure_fails_the_batch() {
		let cache: EmbeddingCache<ByteLen> = EmbeddingCache::new(|| anyhow::bail!("no model"));
		let err = embed_paths(&cache, &[PathBuf::from("x.jpg")]).unwrap_err();
		assert!(matches!(err, Error::ExtractorInit(_)));
	}
}
