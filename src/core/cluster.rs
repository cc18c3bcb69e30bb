//! Clustering parameters, assignments and client-facing groups

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EPS, DEFAULT_MIN_PTS};
use crate::core::PhotoRef;

/// DBSCAN parameters, already validated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterParams {
	/// Maximum cosine distance between neighbors
	pub eps: f32,
	/// Minimum neighborhood size (the point itself included) for a core point
	pub min_pts: usize,
}

impl Default for ClusterParams {
	fn default() -> Self {
		Self {
			eps: DEFAULT_EPS as f32,
			min_pts: DEFAULT_MIN_PTS,
		}
	}
}

/// Partition of point indices into clusters and noise.
///
/// Every index in `0..n` appears in exactly one cluster or in `noise`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterAssignment {
	/// Clusters in seed discovery order; members in discovery order
	pub clusters: Vec<Vec<usize>>,
	/// Indices in no cluster, ascending
	pub noise: Vec<usize>,
}

impl ClusterAssignment {
	pub fn point_count(&self) -> usize {
		self.clusters.iter().map(Vec::len).sum::<usize>() + self.noise.len()
	}
}

/// Pairwise similarity summary of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSimilarity {
	/// Mean pairwise cosine similarity (1.0 for singletons)
	pub average: f32,
	/// Lowest pairwise cosine similarity (1.0 for singletons)
	pub minimum: f32,
	/// Member closest to the group centroid
	pub representative: PhotoRef,
}

/// Photos sharing one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoGroup {
	pub photos: Vec<PhotoRef>,
	pub similarity: GroupSimilarity,
}

/// Aggregate counts, derived on every call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
	pub total_photos: usize,
	pub group_count: usize,
	pub ungrouped_count: usize,
	pub avg_group_size: f64,
}

impl GroupStats {
	pub fn compute(total_photos: usize, groups: &[PhotoGroup], ungrouped_count: usize) -> Self {
		let grouped: usize = groups.iter().map(|g| g.photos.len()).sum();
		let avg_group_size = if groups.is_empty() {
			0.0
		} else {
			grouped as f64 / groups.len() as f64
		};

		Self {
			total_photos,
			group_count: groups.len(),
			ungrouped_count,
			avg_group_size,
		}
	}
}
