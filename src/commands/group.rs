//! Group command - group photos by visual similarity

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

use crate::core::{ClusterParams, GroupPickOutcome};
use crate::models;
use crate::pipeline::{ClusterResponse, Pipeline};
use crate::processing::group::Grouping;
use crate::scoring::{OpenAiScorer, Scorer};
use crate::ui;
use crate::validate::{ClusterRequest, PhotoInput};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupExport {
	timestamp: String,
	params: ClusterParams,
	#[serde(flatten)]
	result: ClusterResponse,
	#[serde(skip_serializing_if = "Option::is_none")]
	picks: Option<Vec<GroupPickOutcome>>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
	inputs: &[PathBuf],
	recursive: bool,
	eps: f64,
	min_pts: usize,
	pick: bool,
	preview: usize,
	export: Option<&Path>,
) -> Result<()> {
	let start = Instant::now();

	let images = super::gather_images(inputs, recursive);
	if images.is_empty() {
		ui::warn("No photos found");
		return Ok(());
	}
	ui::info(&format!("Grouping {} photos", images.len()));

	let request = ClusterRequest {
		photos: images.iter().map(|p| PhotoInput::from(p.as_path())).collect(),
		eps: Some(eps),
		min_pts: Some(min_pts as f64),
	};

	let scorer = if pick {
		Some(OpenAiScorer::from_env().context("Best-pick needs a quality scorer")?)
	} else {
		None
	};

	let pipeline = Pipeline::new(models::shared_vision(), scorer.as_ref().map(|s| s as &dyn Scorer));
	let grouping = pipeline.group(&request)?;

	let picks = if pick && !grouping.groups.is_empty() {
		ui::info(&format!("Picking the best shot in {} groups", grouping.groups.len()));
		Some(pipeline.pick_groups(&grouping.groups))
	} else {
		None
	};

	if let Some(export_path) = export {
		let (_, params) = request.validate()?;
		let export = GroupExport {
			timestamp: chrono::Utc::now().to_rfc3339(),
			params,
			result: grouping.into(),
			picks,
		};
		return super::write_export(&export, export_path);
	}

	print_groups(&grouping, picks.as_deref(), preview);
	eprintln!(
		"\n{}",
		format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed()
	);

	Ok(())
}

fn print_groups(grouping: &Grouping, picks: Option<&[GroupPickOutcome]>, preview: usize) {
	let stats = &grouping.stats;
	ui::success(&format!(
		"{} groups, {} photos, {} ungrouped (avg {:.1} per group)",
		stats.group_count, stats.total_photos, stats.ungrouped_count, stats.avg_group_size
	));

	let winners: HashMap<usize, &GroupPickOutcome> = picks
		.unwrap_or_default()
		.iter()
		.map(|p| (p.group_index, p))
		.collect();

	for (index, group) in grouping.groups.iter().enumerate() {
		eprintln!(
			"\n{} {} ({} photos, {:.1}% similar, min {:.1}%)",
			"Group".bright_white(),
			(index + 1).to_string().bright_cyan(),
			group.photos.len(),
			group.similarity.average * 100.0,
			group.similarity.minimum * 100.0
		);

		let outcome = winners.get(&index);
		let winner = outcome.and_then(|o| o.pick.as_ref()).map(|p| p.winner_path.as_path());

		match outcome {
			Some(GroupPickOutcome { pick: Some(best), .. }) => eprintln!(
				"  {}: {} {}",
				"Best".bright_green(),
				ui::path_link(&best.winner_path, 60).bright_white(),
				format!("({:.0}) {}", best.winner_score, best.reasoning).dimmed()
			),
			Some(GroupPickOutcome { error: Some(e), .. }) => {
				eprintln!("  {}: {}", "Best".bright_red(), e.dimmed())
			}
			_ => eprintln!(
				"  {}: {}",
				"Representative".dimmed(),
				ui::path_link(&group.similarity.representative.path, 60).bright_white()
			),
		}

		for (i, photo) in group.photos.iter().take(preview).enumerate() {
			let marker = if winner == Some(photo.path.as_path()) { "★" } else { " " };
			eprintln!(
				"  {} {} {}",
				marker.bright_yellow(),
				format!("[{}]", i + 1).dimmed(),
				ui::path_link(&photo.path, 60)
			);
		}

		if group.photos.len() > preview {
			eprintln!(
				"  {}",
				format!("... and {} more", group.photos.len() - preview).dimmed()
			);
		}
	}

	if !grouping.ungrouped.is_empty() {
		eprintln!("\n{} ({} photos)", "Ungrouped".bright_yellow(), grouping.ungrouped.len());
		for photo in grouping.ungrouped.iter().take(10) {
			eprintln!("  {}", ui::path_link(&photo.path, 60));
		}
		if grouping.ungrouped.len() > 10 {
			eprintln!(
				"  {}",
				format!("... and {} more", grouping.ungrouped.len() - 10).dimmed()
			);
		}
	}

	if !grouping.failures.is_empty() {
		ui::warn(&format!("{} photos could not be embedded", grouping.failures.len()));
		for failure in &grouping.failures {
			ui::debug(&format!("{}: {}", failure.path.display(), failure.error));
		}
	}
}
