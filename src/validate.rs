//! Request shapes for the clustering and best-pick entry points
//!
//! Everything here runs before any embedding or scoring work starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EPS, DEFAULT_MIN_PTS, MAX_CLUSTER_PHOTOS, MAX_MIN_PTS, MAX_PATH_LEN, MAX_PICK_PHOTOS};
use crate::core::{ClusterParams, PhotoRef};
use crate::error::{Error, Result};

/// One photo as sent by the caller; `id` and `filename` are derived when absent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInput {
	pub path: String,
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub filename: Option<String>,
}

impl From<&Path> for PhotoInput {
	fn from(path: &Path) -> Self {
		Self {
			path: path.to_string_lossy().to_string(),
			id: None,
			filename: None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRequest {
	pub photos: Vec<PhotoInput>,
	#[serde(default)]
	pub eps: Option<f64>,
	/// Read as a number so fractional values can be rejected
	#[serde(default)]
	pub min_pts: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPickRequest {
	pub photo_paths: Vec<String>,
}

impl ClusterRequest {
	pub fn validate(&self) -> Result<(Vec<PhotoRef>, ClusterParams)> {
		check_count("photos", self.photos.len(), MAX_CLUSTER_PHOTOS)?;

		let photos = self
			.photos
			.iter()
			.map(|input| {
				let path = check_path(&input.path)?;
				let mut photo = PhotoRef::from_path(path);
				if let Some(id) = &input.id {
					photo.id = id.clone();
				}
				if let Some(filename) = &input.filename {
					photo.filename = filename.clone();
				}
				Ok(photo)
			})
			.collect::<Result<Vec<_>>>()?;

		let eps = self.eps.unwrap_or(DEFAULT_EPS);
		if !eps.is_finite() || !(0.0..=1.0).contains(&eps) {
			return Err(Error::validation(format!("eps must be within [0, 1], got {}", eps)));
		}

		let min_pts = match self.min_pts {
			None => DEFAULT_MIN_PTS,
			Some(raw) => {
				if !raw.is_finite() || raw.fract() != 0.0 {
					return Err(Error::validation(format!("minPts must be an integer, got {}", raw)));
				}
				if raw < 1.0 || raw > MAX_MIN_PTS as f64 {
					return Err(Error::validation(format!(
						"minPts must be within [1, {}], got {}",
						MAX_MIN_PTS, raw
					)));
				}
				raw as usize
			}
		};

		Ok((photos, ClusterParams { eps: eps as f32, min_pts }))
	}
}

impl BestPickRequest {
	pub fn validate(&self) -> Result<Vec<PathBuf>> {
		check_count("photoPaths", self.photo_paths.len(), MAX_PICK_PHOTOS)?;
		self.photo_paths.iter().map(|p| check_path(p)).collect()
	}
}

fn check_count(field: &str, len: usize, max: usize) -> Result<()> {
	if len == 0 {
		return Err(Error::validation(format!("{} must not be empty", field)));
	}
	if len > max {
		return Err(Error::validation(format!("{} has {} entries, at most {} allowed", field, len, max)));
	}
	Ok(())
}

fn check_path(path: &str) -> Result<PathBuf> {
	if path.is_empty() {
		return Err(Error::validation("path must not be empty"));
	}
	if path.len() > MAX_PATH_LEN {
		return Err(Error::validation(format!("path exceeds {} bytes", MAX_PATH_LEN)));
	}
	if path.contains('\0') {
		return Err(Error::validation("path contains a null byte"));
	}
	Ok(PathBuf::from(path))
}
