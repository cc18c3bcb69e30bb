//! # Quality Scoring
//!
//! The external photo-quality scorer and validation of what it returns.

pub mod openai;

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::PhotoScore;
use crate::error::{Error, Result};

pub use openai::OpenAiScorer;

/// Rates a batch of photos.
///
/// Returns the scorer's raw reply; [`ScoreReport::parse`] validates it.
pub trait Scorer: Send + Sync {
	fn score(&self, paths: &[PathBuf]) -> anyhow::Result<String>;
}

/// Validated scorer verdict for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
	pub scores: Vec<PhotoScore>,
	pub best_index: usize,
	pub best_reasoning: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
	per_photo: Vec<RawPhotoScore>,
	best_index: i64,
	#[serde(default)]
	best_reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPhotoScore {
	sharpness: f64,
	brightness: f64,
	composition: f64,
	final_score: f64,
	#[serde(default)]
	face_score: Option<f64>,
	#[serde(default)]
	all_eyes_open: Option<bool>,
	#[serde(default)]
	face_count: Option<f64>,
	#[serde(default)]
	reasoning: Option<String>,
}

impl ScoreReport {
	/// Validate a raw reply against the batch that was submitted.
	///
	/// Face fields and reasoning default when missing; the quality
	/// sub-scores, final score and best index are required.
	pub fn parse(reply: &str, submitted: &[PathBuf]) -> Result<Self> {
		let json = extract_json_object(reply)
			.ok_or_else(|| Error::MalformedScore("no JSON object in scorer reply".into()))?;

		let raw: RawReport =
			serde_json::from_str(json).map_err(|e| Error::MalformedScore(e.to_string()))?;

		if raw.per_photo.len() != submitted.len() {
			return Err(Error::MalformedScore(format!(
				"scored {} photos but {} were submitted",
				raw.per_photo.len(),
				submitted.len()
			)));
		}

		let best_index = usize::try_from(raw.best_index)
			.ok()
			.filter(|&i| i < submitted.len())
			.ok_or_else(|| {
				Error::MalformedScore(format!(
					"best index {} is outside 0..{}",
					raw.best_index,
					submitted.len()
				))
			})?;

		let scores = raw
			.per_photo
			.into_iter()
			.zip(submitted)
			.map(|(s, path)| {
				PhotoScore::new(
					path.clone(),
					s.sharpness,
					s.brightness,
					s.composition,
					s.face_score.unwrap_or(0.0),
					s.all_eyes_open.unwrap_or(false),
					face_count(s.face_count),
					s.final_score,
					s.reasoning.unwrap_or_default(),
				)
			})
			.collect();

		Ok(Self {
			scores,
			best_index,
			best_reasoning: raw.best_reasoning.unwrap_or_default(),
		})
	}
}

/// Whole, non-negative face count; anything else reads as zero
fn face_count(raw: Option<f64>) -> u32 {
	raw.filter(|c| c.is_finite() && *c >= 0.0)
		.map_or(0, |c| c.round().min(u32::MAX as f64) as u32)
}

/// Outermost `{...}` span, skipping code fences or prose around it
fn extract_json_object(text: &str) -> Option<&str> {
	let start = text.find('{')?;
	let end = text.rfind('}')?;
	(end > start).then(|| &text[start..=end])
}
