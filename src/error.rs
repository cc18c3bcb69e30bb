//! Error taxonomy for the grouping pipeline

use thiserror::Error;

/// Errors surfaced by the clustering and best-pick entry points.
///
/// Per-item failures (one photo failing to embed, one group failing to
/// score) are not errors at this level; they are carried as data in the
/// result types.
#[derive(Debug, Error)]
pub enum Error {
	/// Caller input is malformed, oversized or out of range.
	#[error("invalid request: {0}")]
	Validation(String),

	/// The shared embedding extractor could not be constructed.
	#[error("embedding extractor failed to initialize: {0}")]
	ExtractorInit(String),

	/// Embeddings of unequal length reached the clustering stage.
	#[error("embedding dimension mismatch: expected {expected}, found {found}")]
	DimensionMismatch { expected: usize, found: usize },

	/// The quality scorer could not be reached or returned an error.
	#[error("quality scorer failed: {0}")]
	Scorer(String),

	/// The quality scorer answered with content that does not validate.
	#[error("malformed scorer response: {0}")]
	MalformedScore(String),
}

impl Error {
	pub fn validation(msg: impl Into<String>) -> Self {
		Error::Validation(msg.into())
	}

	/// Caller's fault; never retried.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Error::Validation(_))
	}

	/// HTTP-style status class for hosts exposing the entry points.
	pub fn status(&self) -> u16 {
		if self.is_client_error() {
			400
		} else {
			500
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validation_maps_to_client_status() {
		let err = Error::validation("eps must be within [0, 1]");
		assert!(err.is_client_error());
		assert_eq!(err.status(), 400);
		assert_eq!(err.to_string(), "invalid request: eps must be within [0, 1]");
	}

	#[test]
	fn systemic_and_scorer_errors_map_to_server_status() {
		assert_eq!(Error::ExtractorInit("missing model".into()).status(), 500);
		assert_eq!(Error::DimensionMismatch { expected: 512, found: 3 }.status(), 500);
		assert_eq!(Error::Scorer("timeout".into()).status(), 500);
		assert_eq!(Error::MalformedScore("no JSON".into()).status(), 500);
	}
}
