use burst::core::embedding::cosine_distance;
use burst::processing::Dbscan;
use proptest::prelude::*;

fn points() -> impl Strategy<Value = Vec<Vec<f32>>> {
	prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 3), 1..30)
}

/// Cluster id of every point, None for noise
fn labels(clusters: &[Vec<usize>], n: usize) -> Vec<Option<usize>> {
	let mut out = vec![None; n];
	for (id, members) in clusters.iter().enumerate() {
		for &m in members {
			out[m] = Some(id);
		}
	}
	out
}

fn core_points(data: &[Vec<f32>], eps: f32, min_pts: usize) -> Vec<bool> {
	(0..data.len())
		.map(|i| {
			let neighbors = (0..data.len())
				.filter(|&j| j == i || cosine_distance(&data[i], &data[j]) <= eps)
				.count();
			neighbors >= min_pts
		})
		.collect()
}

proptest! {
	#[test]
	fn prop_every_point_in_exactly_one_place(
		data in points(),
		eps in 0.0f32..1.0,
		min_pts in 1usize..6
	) {
		let result = Dbscan::new(eps, min_pts).fit(&data);

		let mut seen = vec![0usize; data.len()];
		for members in &result.clusters {
			prop_assert!(!members.is_empty());
			for &m in members {
				seen[m] += 1;
			}
		}
		for &m in &result.noise {
			seen[m] += 1;
		}
		prop_assert!(seen.iter().all(|&c| c == 1));
		prop_assert_eq!(result.point_count(), data.len());
	}

	#[test]
	fn prop_min_pts_one_has_no_noise(data in points(), eps in 0.0f32..1.0) {
		let result = Dbscan::new(eps, 1).fit(&data);
		prop_assert!(result.noise.is_empty());
	}

	#[test]
	fn prop_repeated_runs_are_identical(
		data in points(),
		eps in 0.0f32..1.0,
		min_pts in 1usize..6
	) {
		let dbscan = Dbscan::new(eps, min_pts);
		prop_assert_eq!(dbscan.fit(&data), dbscan.fit(&data));
	}

	#[test]
	fn prop_every_cluster_contains_a_core_point(
		data in points(),
		eps in 0.0f32..1.0,
		min_pts in 1usize..6
	) {
		let core = core_points(&data, eps, min_pts);
		let result = Dbscan::new(eps, min_pts).fit(&data);
		for members in &result.clusters {
			prop_assert!(members.iter().any(|&m| core[m]));
		}
		for &m in &result.noise {
			prop_assert!(!core[m]);
		}
	}

	/// Core-point membership and the noise set do not depend on input order.
	/// Border points reachable from two clusters may go either way.
	#[test]
	fn prop_reversed_input_keeps_core_membership(
		data in points(),
		eps in 0.0f32..1.0,
		min_pts in 1usize..6
	) {
		let n = data.len();
		let reversed: Vec<Vec<f32>> = data.iter().rev().cloned().collect();
		let dbscan = Dbscan::new(eps, min_pts);

		let forward = labels(&dbscan.fit(&data).clusters, n);
		let backward_rev = labels(&dbscan.fit(&reversed).clusters, n);
		// Map back to original indices
		let backward: Vec<Option<usize>> = (0..n).map(|i| backward_rev[n - 1 - i]).collect();

		for i in 0..n {
			prop_assert_eq!(forward[i].is_none(), backward[i].is_none());
		}

		let core = core_points(&data, eps, min_pts);
		for i in (0..n).filter(|&i| core[i]) {
			for j in (0..n).filter(|&j| core[j]) {
				prop_assert_eq!(forward[i] == forward[j], backward[i] == backward[j]);
			}
		}
	}
}
