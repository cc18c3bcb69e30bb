//! Pick command - choose the best of a handful of photos

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::*;

use crate::models;
use crate::pipeline::{BestPickResponse, Pipeline};
use crate::scoring::{OpenAiScorer, Scorer};
use crate::ui;
use crate::validate::BestPickRequest;

pub fn run(photos: &[PathBuf], export: Option<&Path>) -> Result<()> {
	let request = BestPickRequest {
		photo_paths: photos.iter().map(|p| p.to_string_lossy().to_string()).collect(),
	};
	request.validate()?;

	// A lone photo never reaches the scorer, so a missing key is only fatal for two or more
	let scorer = match OpenAiScorer::from_env() {
		Ok(scorer) => Some(scorer),
		Err(e) if photos.len() > 1 => return Err(e),
		Err(_) => None,
	};

	let pipeline = Pipeline::new(models::shared_vision(), scorer.as_ref().map(|s| s as &dyn Scorer));
	ui::info(&format!("Scoring {} photos", photos.len()));
	let response = pipeline.best_pick(&request)?;

	if let Some(export_path) = export {
		return super::write_export(&response, export_path);
	}

	print_pick(&response);
	Ok(())
}

fn print_pick(response: &BestPickResponse) {
	ui::success(&format!(
		"Best: {} ({:.0})",
		ui::path_link(&response.winner_path, 60),
		response.winner_score
	));
	if !response.reasoning.is_empty() {
		eprintln!("  {}", response.reasoning.dimmed());
	}

	ui::header("Scores");
	for score in &response.per_photo_scores {
		let marker = if score.path == response.winner_path { "★" } else { " " };
		eprintln!(
			"  {} {} {}",
			marker.bright_yellow(),
			ui::path_link(&score.path, 50),
			format!(
				"final {:.0} · quality {:.0} · faces {} ({:.0}{})",
				score.final_score,
				score.image_quality,
				score.face_count,
				score.face_quality,
				if score.all_eyes_open { ", eyes open" } else { "" }
			)
			.dimmed()
		);
		if !score.reasoning.is_empty() {
			eprintln!("      {}", score.reasoning.dimmed());
		}
	}
}
