//! Photo grouping: embeddings in, client-facing groups out

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{ClusterParams, Embedding, GroupSimilarity, GroupStats, PhotoGroup, PhotoRef};
use crate::error::{Error, Result};
use crate::models::{EmbeddingCache, Extractor};
use crate::processing::dbscan::Dbscan;
use crate::processing::embed::{embed_paths, EmbeddingResult};
use crate::ui;

/// A photo that could not be embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingFailure {
	pub path: PathBuf,
	pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
	pub groups: Vec<PhotoGroup>,
	/// Noise points and photos that failed to embed, in input order
	pub ungrouped: Vec<PhotoRef>,
	pub failures: Vec<EmbeddingFailure>,
	pub stats: GroupStats,
}

/// Embed the photos and group them by visual similarity
pub fn group_photos<E: Extractor>(
	cache: &EmbeddingCache<E>,
	photos: &[PhotoRef],
	params: ClusterParams,
) -> Result<Grouping> {
	let paths: Vec<PathBuf> = photos.iter().map(|p| p.path.clone()).collect();
	let results = embed_paths(cache, &paths)?;
	group_embedded(photos, &results, params)
}

/// Group photos whose embeddings are already computed.
///
/// `results[i]` must belong to `photos[i]`.
pub fn group_embedded(
	photos: &[PhotoRef],
	results: &[EmbeddingResult],
	params: ClusterParams,
) -> Result<Grouping> {
	debug_assert_eq!(photos.len(), results.len());

	let mut embedded: Vec<(usize, &Embedding)> = Vec::with_capacity(photos.len());
	let mut failed: Vec<usize> = Vec::new();
	let mut failures = Vec::new();

	for (idx, result) in results.iter().enumerate() {
		match &result.outcome {
			Ok(embedding) => embedded.push((idx, embedding)),
			Err(error) => {
				failed.push(idx);
				failures.push(EmbeddingFailure {
					path: result.path.clone(),
					error: error.clone(),
				});
			}
		}
	}

	if embedded.is_empty() {
		ui::warn("No photo produced an embedding, nothing to group");
		return Ok(Grouping {
			groups: Vec::new(),
			ungrouped: photos.to_vec(),
			failures,
			stats: GroupStats::compute(photos.len(), &[], photos.len()),
		});
	}

	let dim = embedded[0].1.dim();
	if let Some((_, bad)) = embedded.iter().find(|(_, e)| e.dim() != dim) {
		return Err(Error::DimensionMismatch { expected: dim, found: bad.dim() });
	}

	let vectors: Vec<&[f32]> = embedded.iter().map(|(_, e)| e.as_slice()).collect();
	let assignment = Dbscan::from_params(params).fit(&vectors);

	ui::debug(&format!(
		"Found {} clusters and {} noise points (eps={}, minPts={})",
		assignment.clusters.len(),
		assignment.noise.len(),
		params.eps,
		params.min_pts
	));

	let groups: Vec<PhotoGroup> = assignment
		.clusters
		.par_iter()
		.map(|members| {
			let photo_idx: Vec<usize> = members.iter().map(|&m| embedded[m].0).collect();
			let embeddings: Vec<&Embedding> = members.iter().map(|&m| embedded[m].1).collect();
			build_group(photos, &photo_idx, &embeddings)
		})
		.collect();

	let mut ungrouped_idx: Vec<usize> = assignment
		.noise
		.iter()
		.map(|&m| embedded[m].0)
		.chain(failed)
		.collect();
	ungrouped_idx.sort_unstable();
	let ungrouped: Vec<PhotoRef> = ungrouped_idx.into_iter().map(|i| photos[i].clone()).collect();

	let stats = GroupStats::compute(photos.len(), &groups, ungrouped.len());

	Ok(Grouping { groups, ungrouped, failures, stats })
}

fn build_group(photos: &[PhotoRef], photo_idx: &[usize], embeddings: &[&Embedding]) -> PhotoGroup {
	let members: Vec<PhotoRef> = photo_idx.iter().map(|&i| photos[i].clone()).collect();
	let (average, minimum) = pairwise_similarity(embeddings);
	let representative = members[find_representative(embeddings)].clone();

	PhotoGroup {
		photos: members,
		similarity: GroupSimilarity { average, minimum, representative },
	}
}

/// Mean and minimum pairwise similarity; (1.0, 1.0) for a singleton
fn pairwise_similarity(embeddings: &[&Embedding]) -> (f32, f32) {
	let mut total = 0.0;
	let mut minimum = f32::INFINITY;
	let mut count = 0;

	for i in 0..embeddings.len() {
		for j in (i + 1)..embeddings.len() {
			let sim = embeddings[i].similarity(embeddings[j]);
			total += sim;
			minimum = minimum.min(sim);
			count += 1;
		}
	}

	if count == 0 {
		(1.0, 1.0)
	} else {
		(total / count as f32, minimum)
	}
}

/// Position of the member closest to the normalized centroid, first on ties
fn find_representative(embeddings: &[&Embedding]) -> usize {
	let Some(centroid) = Embedding::centroid(embeddings) else {
		return 0;
	};

	let mut best = 0;
	let mut best_sim = f32::NEG_INFINITY;
	for (i, emb) in embeddings.iter().enumerate() {
		let sim = centroid.similarity(emb);
		if sim > best_sim {
			best = i;
			best_sim = sim;
		}
	}
	best
}

#[cfg(test)]
mod tests {
	use super::*;

	fn photo(name: &str) -> PhotoRef {
		PhotoRef::from_path(format!("/shoot/{}", name))
	}

	fn ok(p: &PhotoRef, v: Vec<f32>) -> EmbeddingResult {
		EmbeddingResult::embedded(p.path.clone(), Embedding::raw(v))
	}

	fn err(p: &PhotoRef) -> EmbeddingResult {
		EmbeddingResult::failed(p.path.clone(), "not found")
	}

	#[test]
	fn failed_embedding_is_ungrouped_not_dropped() {
		let photos: Vec<PhotoRef> = ["a.jpg", "b.jpg", "x.jpg", "c.jpg", "d.jpg"].iter().map(|n| photo(n)).collect();
		let results = vec![
			ok(&photos[0], vec![1.0, 0.0]),
			ok(&photos[1], vec![0.99, 0.02]),
			err(&photos[2]),
			ok(&photos[3], vec![0.0, 1.0]),
			ok(&photos[4], vec![0.01, 0.98]),
		];

		let grouping = group_embedded(&photos, &results, ClusterParams::default()).unwrap();

		assert_eq!(grouping.groups.len(), 2);
		assert_eq!(grouping.groups[0].photos, vec![photos[0].clone(), photos[1].clone()]);
		assert_eq!(grouping.groups[1].photos, vec![photos[3].clone(), photos[4].clone()]);
		assert_eq!(grouping.ungrouped, vec![photos[2].clone()]);
		assert_eq!(grouping.failures.len(), 1);
		assert_eq!(grouping.failures[0].path, photos[2].path);
		assert_eq!(grouping.stats.total_photos, 5);
		assert_eq!(grouping.stats.group_count, 2);
		assert_eq!(grouping.stats.ungrouped_count, 1);
		assert!((grouping.stats.avg_group_size - 2.0).abs() < 1e-9);
	}

	#[test]
	fn zero_embeddings_short_circuit_without_error() {
		let photos: Vec<PhotoRef> = ["a.jpg", "b.jpg", "c.jpg"].iter().map(|n| photo(n)).collect();
		let results: Vec<EmbeddingResult> = photos.iter().map(err).collect();

		let grouping = group_embedded(&photos, &results, ClusterParams::default()).unwrap();

		assert!(grouping.groups.is_empty());
		assert_eq!(grouping.ungrouped, photos);
		assert_eq!(grouping.failures.len(), 3);
		assert_eq!(
			grouping.stats,
			GroupStats { total_photos: 3, group_count: 0, ungrouped_count: 3, avg_group_size: 0.0 }
		);
	}

	#[test]
	fn noise_and_failures_are_merged_in_input_order() {
		let photos: Vec<PhotoRef> = ["n1.jpg", "bad.jpg", "a.jpg", "b.jpg", "n2.jpg"].iter().map(|n| photo(n)).collect();
		let results = vec![
			ok(&photos[0], vec![-1.0, 0.0]),
			err(&photos[1]),
			ok(&photos[2], vec![1.0, 0.0]),
			ok(&photos[3], vec![1.0, 0.01]),
			ok(&photos[4], vec![0.0, -1.0]),
		];

		let grouping = group_embedded(&photos, &results, ClusterParams::default()).unwrap();

		assert_eq!(grouping.groups.len(), 1);
		assert_eq!(
			grouping.ungrouped,
			vec![photos[0].clone(), photos[1].clone(), photos[4].clone()]
		);
		assert_eq!(grouping.stats.ungrouped_count, 3);
	}

	#[test]
	fn mismatched_dimensions_are_a_systemic_error() {
		let photos: Vec<PhotoRef> = ["a.jpg", "b.jpg"].iter().map(|n| photo(n)).collect();
		let results = vec![ok(&photos[0], vec![1.0, 0.0]), ok(&photos[1], vec![1.0, 0.0, 0.0])];

		let err = group_embedded(&photos, &results, ClusterParams::default()).unwrap_err();
		assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 3 }));
	}

	#[test]
	fn group_similarity_reports_mean_minimum_and_representative() {
		let photos: Vec<PhotoRef> = ["l.jpg", "m.jpg", "r.jpg"].iter().map(|n| photo(n)).collect();
		let results = vec![
			ok(&photos[0], vec![1.0, -0.1]),
			ok(&photos[1], vec![1.0, 0.0]),
			ok(&photos[2], vec![1.0, 0.1]),
		];

		let grouping = group_embedded(&photos, &results, ClusterParams::default()).unwrap();
		let similarity = &grouping.groups[0].similarity;

		assert_eq!(similarity.representative, photos[1]);
		assert!(similarity.minimum < similarity.average);
		assert!(similarity.average <= 1.0);
	}

	#[test]
	fn singleton_groups_have_perfect_similarity() {
		let photos = vec![photo("solo.jpg")];
		let results = vec![ok(&photos[0], vec![0.3, 0.4])];
		let params = ClusterParams { eps: 0.25, min_pts: 1 };

		let grouping = group_embedded(&photos, &results, params).unwrap();

		assert_eq!(grouping.groups.len(), 1);
		assert_eq!(grouping.groups[0].similarity.average, 1.0);
		assert_eq!(grouping.groups[0].similarity.minimum, 1.0);
	}
}
