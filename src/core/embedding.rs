//! Embedding vectors and cosine geometry

/// Fixed-length feature vector produced by the image encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
	/// Create normalized embedding from raw data
	pub fn new(data: Vec<f32>) -> Self {
		Self(normalize(&data))
	}

	/// Wrap data as-is
	pub fn raw(data: Vec<f32>) -> Self {
		Self(data)
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	/// Cosine similarity in [-1.0, 1.0]
	pub fn similarity(&self, other: &Self) -> f32 {
		cosine_similarity(&self.0, &other.0)
	}

	/// Cosine distance in [0.0, 2.0]
	pub fn distance(&self, other: &Self) -> f32 {
		cosine_distance(&self.0, &other.0)
	}

	/// Normalized mean of a set of embeddings
	pub fn centroid(embeddings: &[&Embedding]) -> Option<Self> {
		let dim = embeddings.first()?.dim();
		let mut sum = vec![0.0f32; dim];
		for emb in embeddings {
			for (acc, v) in sum.iter_mut().zip(emb.0.iter()) {
				*acc += v;
			}
		}
		let n = embeddings.len() as f32;
		sum.iter_mut().for_each(|v| *v /= n);
		Some(Self::new(sum))
	}
}

impl AsRef<[f32]> for Embedding {
	fn as_ref(&self) -> &[f32] {
		&self.0
	}
}

pub fn norm(v: &[f32]) -> f32 {
	v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity; a zero-magnitude vector has similarity 0 with anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	similarity_with_norms(a, norm(a), b, norm(b))
}

pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
	1.0 - cosine_similarity(a, b)
}

/// Same as [`cosine_similarity`] with precomputed magnitudes
pub(crate) fn similarity_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}
	let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
	dot / (norm_a * norm_b)
}

fn normalize(v: &[f32]) -> Vec<f32> {
	let norm = norm(v);
	if norm > 0.0 {
		v.iter().map(|x| x / norm).collect()
	} else {
		v.to_vec()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn self_similarity_is_one() {
		let a = Embedding::raw(vec![0.3, -1.2, 4.0, 0.01]);
		assert!((a.similarity(&a) - 1.0).abs() < 1e-6);
		assert!(a.distance(&a).abs() < 1e-6);
	}

	#[test]
	fn distance_is_symmetric() {
		let a = Embedding::raw(vec![1.0, 2.0, 3.0]);
		let b = Embedding::raw(vec![-2.0, 0.5, 1.0]);
		assert_eq!(a.distance(&b), b.distance(&a));
	}

	#[test]
	fn zero_vector_has_distance_one() {
		let zero = Embedding::raw(vec![0.0; 4]);
		let a = Embedding::raw(vec![1.0, 0.0, 0.0, 0.0]);
		assert_eq!(zero.similarity(&a), 0.0);
		assert_eq!(zero.distance(&a), 1.0);
		assert_eq!(zero.distance(&zero), 1.0);
	}

	#[test]
	fn opposite_vectors_have_distance_two() {
		let a = Embedding::raw(vec![1.0, 1.0]);
		let b = Embedding::raw(vec![-1.0, -1.0]);
		assert!((a.distance(&b) - 2.0).abs() < 1e-6);
	}

	#[test]
	fn new_normalizes_to_unit_length() {
		let a = Embedding::new(vec![3.0, 4.0]);
		assert!((norm(a.as_slice()) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn centroid_of_nothing_is_none() {
		assert!(Embedding::centroid(&[]).is_none());
	}
}
