//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod group;
pub mod pick;

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::core::photo::is_supported_image;
use crate::ui;

/// Expand the given files and directories into a sorted list of images
pub fn gather_images(inputs: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
	let mut images = Vec::new();

	for input in inputs {
		if input.is_dir() {
			let depth = if recursive { usize::MAX } else { 1 };
			let mut found: Vec<PathBuf> = WalkDir::new(input)
				.max_depth(depth)
				.into_iter()
				.filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
				.filter_map(|e| e.ok())
				.filter(|e| e.file_type().is_file() && is_supported_image(e.path()))
				.map(|e| e.into_path())
				.collect();
			found.sort();
			ui::debug(&format!("{} images in {}", found.len(), input.display()));
			images.extend(found);
		} else if is_supported_image(input) {
			images.push(input.clone());
		} else {
			ui::debug(&format!("Skipping non-image: {}", input.display()));
		}
	}

	images
}

fn is_hidden(path: &Path) -> bool {
	path.file_name()
		.and_then(|n| n.to_str())
		.is_some_and(|n| n.starts_with('.'))
}

/// Pretty JSON to a file, or stdout for '-'
pub fn write_export<T: serde::Serialize>(value: &T, export_path: &Path) -> Result<()> {
	let json = serde_json::to_string_pretty(value)?;

	if export_path.to_str() == Some("-") || export_path.as_os_str().is_empty() {
		println!("{}", json);
	} else {
		std::fs::write(export_path, json)?;
		ui::success(&format!("Exported to {}", export_path.display()));
	}
	Ok(())
}
