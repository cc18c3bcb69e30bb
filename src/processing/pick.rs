//! Best-pick: one winner per group via the quality scorer

use std::path::PathBuf;

use rayon::prelude::*;

use crate::config::{AUTO_WINNER_SCORE, MAX_PICK_PHOTOS};
use crate::core::{BestPick, GroupPickOutcome, PhotoScore};
use crate::error::{Error, Result};
use crate::scoring::{ScoreReport, Scorer};
use crate::ui;

/// Pick the best photo of one group.
///
/// A single photo wins outright without consulting the scorer. Larger
/// groups are scored in batches of at most [`MAX_PICK_PHOTOS`].
pub fn pick_best<S: Scorer + ?Sized>(scorer: &S, photos: &[PathBuf]) -> Result<BestPick> {
	match photos {
		[] => Err(Error::validation("cannot pick from an empty group")),
		[only] => Ok(auto_winner(only)),
		_ => {
			let (head, tail) = photos.split_at(photos.len().min(MAX_PICK_PHOTOS));
			let first = score_batch(scorer, head)?;
			let rest = tail
				.chunks(MAX_PICK_PHOTOS)
				.map(|batch| score_batch(scorer, batch))
				.collect::<Result<Vec<_>>>()?;
			Ok(combine(first, rest))
		}
	}
}

/// Pick a winner for every group; one group's failure does not affect others.
pub fn pick_groups<S: Scorer + ?Sized>(scorer: &S, groups: &[Vec<PathBuf>]) -> Vec<GroupPickOutcome> {
	groups
		.par_iter()
		.enumerate()
		.map(|(index, photos)| {
			let result = pick_best(scorer, photos);
			if let Err(e) = &result {
				ui::warn(&format!("Group {} could not be scored: {}", index + 1, e));
			}
			GroupPickOutcome::from_result(index, result)
		})
		.collect()
}

fn auto_winner(path: &PathBuf) -> BestPick {
	let score = PhotoScore::new(
		path.clone(),
		AUTO_WINNER_SCORE,
		AUTO_WINNER_SCORE,
		AUTO_WINNER_SCORE,
		0.0,
		false,
		0,
		AUTO_WINNER_SCORE,
		"Only photo in its group".to_string(),
	);

	BestPick {
		winner_path: path.clone(),
		winner_score: AUTO_WINNER_SCORE,
		per_photo_scores: vec![score],
		reasoning: "Only photo in its group".to_string(),
	}
}

fn score_batch<S: Scorer + ?Sized>(scorer: &S, batch: &[PathBuf]) -> Result<ScoreReport> {
	let reply = scorer
		.score(batch)
		.map_err(|e| Error::Scorer(format!("{:#}", e)))?;
	ScoreReport::parse(&reply, batch)
}

/// Merge batch reports; across batches the best-rated batch winner wins
fn combine(first: ScoreReport, rest: Vec<ScoreReport>) -> BestPick {
	let mut best = first.scores[first.best_index].clone();
	let mut reasoning = first.best_reasoning;
	let mut per_photo_scores = first.scores;

	for report in rest {
		let finalist = &report.scores[report.best_index];
		if finalist.final_score > best.final_score {
			best = finalist.clone();
			reasoning = report.best_reasoning;
		}
		per_photo_scores.extend(report.scores);
	}

	BestPick {
		winner_path: best.path,
		winner_score: best.final_score,
		per_photo_scores,
		reasoning,
	}
}
