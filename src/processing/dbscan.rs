//! DBSCAN over cosine distance
//!
//! Points are visited in input order. The neighborhood of a point always
//! contains the point itself, so `min_pts == 1` makes every point a core
//! point. A point first marked as noise can later be claimed as a border
//! point by a cluster discovered afterwards.

use rayon::prelude::*;

use crate::core::embedding::{norm, similarity_with_norms};
use crate::core::{ClusterAssignment, ClusterParams};

#[derive(Debug, Clone, Copy)]
pub struct Dbscan {
	eps: f32,
	min_pts: usize,
}

impl Dbscan {
	pub fn new(eps: f32, min_pts: usize) -> Self {
		Self { eps, min_pts }
	}

	pub fn from_params(params: ClusterParams) -> Self {
		Self::new(params.eps, params.min_pts)
	}

	/// Cluster the points.
	///
	/// # Panics
	///
	/// If the points do not all have the same length.
	pub fn fit<P: AsRef<[f32]> + Sync>(&self, points: &[P]) -> ClusterAssignment {
		let n = points.len();
		if let Some(first) = points.first() {
			let dim = first.as_ref().len();
			if let Some(bad) = points.iter().position(|p| p.as_ref().len() != dim) {
				panic!(
					"embedding dimension mismatch at index {}: expected {}, found {}",
					bad,
					dim,
					points[bad].as_ref().len()
				);
			}
		}

		let neighborhoods = self.neighborhoods(points);

		let mut visited = vec![false; n];
		let mut labels: Vec<Option<usize>> = vec![None; n];
		let mut clusters: Vec<Vec<usize>> = Vec::new();

		for p in 0..n {
			if visited[p] {
				continue;
			}
			visited[p] = true;

			// Too sparse: stays noise unless a later cluster reaches it
			if neighborhoods[p].len() < self.min_pts {
				continue;
			}

			let cluster_id = clusters.len();
			let mut members = vec![p];
			labels[p] = Some(cluster_id);

			let mut work: Vec<usize> = neighborhoods[p].clone();
			let mut cursor = 0;
			while cursor < work.len() {
				let q = work[cursor];
				cursor += 1;

				if !visited[q] {
					visited[q] = true;
					if neighborhoods[q].len() >= self.min_pts {
						work.extend_from_slice(&neighborhoods[q]);
					}
				}

				// Border-point claim, including points previously left as noise
				if labels[q].is_none() {
					labels[q] = Some(cluster_id);
					members.push(q);
				}
			}

			clusters.push(members);
		}

		clusters.retain(|c| !c.is_empty());
		let noise = (0..n).filter(|&i| labels[i].is_none()).collect();

		ClusterAssignment { clusters, noise }
	}

	/// Indices within `eps` of each point, the point itself always first
	fn neighborhoods<P: AsRef<[f32]> + Sync>(&self, points: &[P]) -> Vec<Vec<usize>> {
		let norms: Vec<f32> = points.iter().map(|p| norm(p.as_ref())).collect();

		(0..points.len())
			.into_par_iter()
			.map(|i| {
				let a = points[i].as_ref();
				let mut region = vec![i];
				region.extend((0..points.len()).filter(|&j| {
					j != i && {
						let sim = similarity_with_norms(a, norms[i], points[j].as_ref(), norms[j]);
						1.0 - sim <= self.eps
					}
				}));
				region
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn unit(angle_deg: f32) -> Vec<f32> {
		let r = angle_deg.to_radians();
		vec![r.cos(), r.sin()]
	}

	#[test]
	fn dense_triple_clusters_and_outliers_are_noise() {
		// 0..2 within a few degrees (distance < 0.01), 3 and 4 far from everything
		let points = vec![
			vec![1.0, 0.0, 0.0],
			vec![0.99, 0.05, 0.0],
			vec![0.98, 0.0, 0.08],
			vec![0.0, 1.0, 0.0],
			vec![0.0, 0.0, 1.0],
		];
		let result = Dbscan::new(0.25, 2).fit(&points);

		assert_eq!(result.clusters, vec![vec![0, 1, 2]]);
		assert_eq!(result.noise, vec![3, 4]);
	}

	#[test]
	fn min_pts_one_leaves_no_noise() {
		let points: Vec<Vec<f32>> = [0.0, 90.0, 180.0, 270.0].iter().map(|&a| unit(a)).collect();
		let result = Dbscan::new(0.1, 1).fit(&points);

		assert!(result.noise.is_empty());
		assert_eq!(result.clusters, vec![vec![0], vec![1], vec![2], vec![3]]);
	}

	#[test]
	fn noise_point_is_reclaimed_as_border_point() {
		// Point 0 only reaches point 1, so with min_pts 3 it is noise when visited.
		// Point 1 is core (0, 1, 2) and later absorbs 0 as a border point.
		let points = vec![unit(0.0), unit(30.0), unit(60.0)];
		let eps = 1.0 - 35f32.to_radians().cos();
		let result = Dbscan::new(eps, 3).fit(&points);

		assert_eq!(result.clusters, vec![vec![1, 0, 2]]);
		assert!(result.noise.is_empty());
	}

	#[test]
	fn identical_points_form_one_cluster() {
		let points = vec![vec![0.5, 0.5, 0.5]; 6];
		let result = Dbscan::new(0.01, 2).fit(&points);

		assert_eq!(result.clusters, vec![vec![0, 1, 2, 3, 4, 5]]);
		assert!(result.noise.is_empty());
	}

	#[test]
	fn single_point_is_noise_unless_min_pts_is_one() {
		let points = vec![vec![1.0, 2.0]];
		assert_eq!(Dbscan::new(0.25, 2).fit(&points).noise, vec![0]);
		assert_eq!(Dbscan::new(0.25, 1).fit(&points).clusters, vec![vec![0]]);
	}

	#[test]
	fn empty_input_yields_empty_assignment() {
		let points: Vec<Vec<f32>> = Vec::new();
		assert_eq!(Dbscan::new(0.25, 2).fit(&points), ClusterAssignment::default());
	}

	#[test]
	fn zero_vectors_are_not_similar_to_anything() {
		let points = vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![1.0, 0.0]];
		let result = Dbscan::new(0.5, 2).fit(&points);

		assert!(result.clusters.is_empty());
		assert_eq!(result.noise, vec![0, 1, 2]);
	}

	#[test]
	fn chained_neighbors_join_through_core_points() {
		// Each step is 20°, eps covers one step but not two
		let points: Vec<Vec<f32>> = (0..5).map(|i| unit(i as f32 * 20.0)).collect();
		let eps = 1.0 - 25f32.to_radians().cos();
		let result = Dbscan::new(eps, 2).fit(&points);

		assert_eq!(result.clusters.len(), 1);
		assert_eq!(result.clusters[0], vec![0, 1, 2, 3, 4]);
	}

	#[test]
	fn repeated_runs_are_identical() {
		let points: Vec<Vec<f32>> = [0.0, 3.0, 50.0, 52.0, 140.0, 200.0].iter().map(|&a| unit(a)).collect();
		let dbscan = Dbscan::new(0.01, 2);
		assert_eq!(dbscan.fit(&points), dbscan.fit(&points));
	}

	#[test]
	#[should_panic(expected = "dimension mismatch")]
	fn mismatched_dimensions_fail_fast() {
		let points = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
		Dbscan::new(0.25, 2).fit(&points);
	}
}
