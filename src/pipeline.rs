//! Entry points: clustering and best-pick over validated requests

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{BestPick, GroupPickOutcome, GroupSimilarity, GroupStats, PhotoGroup, PhotoRef, PhotoScore};
use crate::error::Result;
use crate::models::{EmbeddingCache, Extractor};
use crate::processing::group::{group_photos, EmbeddingFailure, Grouping};
use crate::processing::pick::{pick_best, pick_groups};
use crate::scoring::Scorer;
use crate::validate::{BestPickRequest, ClusterRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResponse {
	pub groups: Vec<Vec<PhotoRef>>,
	pub ungrouped: Vec<PhotoRef>,
	pub stats: GroupStats,
	/// Parallel to `groups`
	pub similarity: Vec<GroupSimilarity>,
	pub failures: Vec<EmbeddingFailure>,
}

impl From<Grouping> for ClusterResponse {
	fn from(grouping: Grouping) -> Self {
		let (groups, similarity) = grouping
			.groups
			.into_iter()
			.map(|g| (g.photos, g.similarity))
			.unzip();

		Self {
			groups,
			ungrouped: grouping.ungrouped,
			stats: grouping.stats,
			similarity,
			failures: grouping.failures,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPickResponse {
	pub winner_path: PathBuf,
	pub winner_score: f64,
	pub per_photo_scores: Vec<PhotoScore>,
	pub reasoning: String,
}

impl From<BestPick> for BestPickResponse {
	fn from(pick: BestPick) -> Self {
		Self {
			winner_path: pick.winner_path,
			winner_score: pick.winner_score,
			per_photo_scores: pick.per_photo_scores,
			reasoning: pick.reasoning,
		}
	}
}

/// Request-scoped view over the shared extractor and an optional scorer
pub struct Pipeline<'a, E> {
	cache: &'a EmbeddingCache<E>,
	scorer: Option<&'a dyn Scorer>,
}

impl<'a, E: Extractor> Pipeline<'a, E> {
	pub fn new(cache: &'a EmbeddingCache<E>, scorer: Option<&'a dyn Scorer>) -> Self {
		Self { cache, scorer }
	}

	/// Group photos by visual similarity
	pub fn cluster(&self, request: &ClusterRequest) -> Result<ClusterResponse> {
		self.group(request).map(ClusterResponse::from)
	}

	/// Like [`Pipeline::cluster`], keeping the richer internal shape
	pub fn group(&self, request: &ClusterRequest) -> Result<Grouping> {
		let (photos, params) = request.validate()?;
		group_photos(self.cache, &photos, params)
	}

	/// Choose the best of up to ten photos
	pub fn best_pick(&self, request: &BestPickRequest) -> Result<BestPickResponse> {
		let paths = request.validate()?;
		let pick = pick_best(self.scorer(), &paths)?;
		Ok(pick.into())
	}

	/// Best-pick every group independently.
	///
	/// Without a scorer, groups of two or more photos carry a scorer error
	/// while single-photo groups still win outright.
	pub fn pick_groups(&self, groups: &[PhotoGroup]) -> Vec<GroupPickOutcome> {
		let paths: Vec<Vec<PathBuf>> = groups
			.iter()
			.map(|g| g.photos.iter().map(|p| p.path.clone()).collect())
			.collect();

		pick_groups(self.scorer(), &paths)
	}

	fn scorer(&self) -> &'a dyn Scorer {
		self.scorer.unwrap_or(&NoScorer)
	}
}

/// Stand-in when no scorer is configured; single photos never reach it
struct NoScorer;

impl Scorer for NoScorer {
	fn score(&self, _paths: &[PathBuf]) -> anyhow::Result<String> {
		anyhow::bail!("no quality scorer configured")
	}
}
