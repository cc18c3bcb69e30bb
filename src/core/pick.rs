//! Best-pick results

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Scorer ratings for one photo plus derived aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoScore {
	pub path: PathBuf,
	pub sharpness: f64,
	pub brightness: f64,
	pub composition: f64,
	pub face_score: f64,
	pub all_eyes_open: bool,
	pub face_count: u32,
	pub final_score: f64,
	pub reasoning: String,
	/// Mean of sharpness, brightness and composition
	pub image_quality: f64,
	/// Passthrough of `face_score`
	pub face_quality: f64,
}

impl PhotoScore {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		path: PathBuf,
		sharpness: f64,
		brightness: f64,
		composition: f64,
		face_score: f64,
		all_eyes_open: bool,
		face_count: u32,
		final_score: f64,
		reasoning: String,
	) -> Self {
		Self {
			path,
			sharpness,
			brightness,
			composition,
			face_score,
			all_eyes_open,
			face_count,
			final_score,
			reasoning,
			image_quality: (sharpness + brightness + composition) / 3.0,
			face_quality: face_score,
		}
	}
}

/// Winner of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPick {
	pub winner_path: PathBuf,
	pub winner_score: f64,
	pub per_photo_scores: Vec<PhotoScore>,
	pub reasoning: String,
}

/// Best-pick result of one group in a multi-group run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPickOutcome {
	pub group_index: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pick: Option<BestPick>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl GroupPickOutcome {
	pub fn from_result(group_index: usize, result: crate::Result<BestPick>) -> Self {
		match result {
			Ok(pick) => Self { group_index, pick: Some(pick), error: None },
			Err(e) => Self { group_index, pick: None, error: Some(e.to_string()) },
		}
	}
}
