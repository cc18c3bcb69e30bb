//! Photo references handed into the pipeline

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::IMAGE_EXTENSIONS;

/// A photo known to the caller. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoRef {
	/// Stable identifier derived from the path
	pub id: String,
	pub path: PathBuf,
	pub filename: String,
}

impl PhotoRef {
	pub fn from_path(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let filename = path
			.file_name()
			.map(|n| n.to_string_lossy().to_string())
			.unwrap_or_else(|| path.to_string_lossy().to_string());

		Self {
			id: path_id(&path),
			path,
			filename,
		}
	}
}

/// 64-bit xxh3 of the path string, hex encoded
pub fn path_id(path: &Path) -> String {
	format!("{:016x}", xxh3_64(path.to_string_lossy().as_bytes()))
}

/// Extension-based check for files the encoder can read
pub fn is_supported_image(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn id_is_stable_and_path_derived() {
		let a = PhotoRef::from_path("/photos/trip/IMG_0001.jpg");
		let b = PhotoRef::from_path("/photos/trip/IMG_0001.jpg");
		let c = PhotoRef::from_path("/photos/trip/IMG_0002.jpg");

		assert_eq!(a.id, b.id);
		assert_ne!(a.id, c.id);
		assert_eq!(a.id.len(), 16);
		assert_eq!(a.filename, "IMG_0001.jpg");
	}

	#[test]
	fn image_extensions_are_case_insensitive() {
		assert!(is_supported_image(Path::new("a/B.JPG")));
		assert!(is_supported_image(Path::new("a/b.webp")));
		assert!(!is_supported_image(Path::new("a/b.txt")));
		assert!(!is_supported_image(Path::new("a/noext")));
	}
}
