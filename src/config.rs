//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};

static CUSTOM_MODEL_DIR: OnceLock<PathBuf> = OnceLock::new();
static CUSTOM_VISION: OnceLock<PathBuf> = OnceLock::new();

// === Model Files ===
pub const VISION_MODEL: &str = "clip_vision.onnx";

// === Model Parameters ===
pub const INPUT_SIZE: u32 = 224;
pub const EMBEDDING_DIM: usize = 512;
pub const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
pub const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_6, 0.275_777_1];

// === Clustering ===
pub const DEFAULT_EPS: f64 = 0.25;
pub const DEFAULT_MIN_PTS: usize = 2;
pub const MAX_MIN_PTS: usize = 100;
pub const MAX_CLUSTER_PHOTOS: usize = 1000;
pub const MAX_PATH_LEN: usize = 4096;

// === Best Pick ===
pub const MAX_PICK_PHOTOS: usize = 10;
pub const AUTO_WINNER_SCORE: f64 = 100.0;

// === Quality Scorer ===
pub const DEFAULT_SCORER_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SCORER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SCORER_TIMEOUT_SECS: u64 = 60;
pub const SCORER_MAX_EDGE: u32 = 1024;

// === File Extensions ===
pub const IMAGE_EXTENSIONS: &[&str] = &[
	"jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif", "avif",
];

pub fn set_model_dir(path: PathBuf) {
	let _ = CUSTOM_MODEL_DIR.set(path);
}

pub fn set_vision_model(path: PathBuf) {
	let _ = CUSTOM_VISION.set(path);
}

/// Get models directory (--models flag, BURST_MODELS_DIR, or next to the executable)
pub fn models_dir() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_MODEL_DIR.get() {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.clone());
	}

	if let Ok(env_path) = std::env::var("BURST_MODELS_DIR") {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using BURST_MODELS_DIR: {}", env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models");
			if models.is_dir() {
				crate::ui::debug(&format!("Found models at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}

pub fn get_vision_model_path() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_VISION.get() {
		return Some(custom.clone());
	}
	models_dir().map(|d| d.join(VISION_MODEL))
}

/// Connection settings for the OpenAI-compatible quality scorer
#[derive(Debug, Clone)]
pub struct ScorerConfig {
	pub base_url: String,
	pub model: String,
	pub api_key: String,
	pub timeout: Duration,
}

impl ScorerConfig {
	pub fn from_env() -> Result<Self> {
		let api_key = std::env::var("BURST_SCORER_API_KEY")
			.or_else(|_| std::env::var("OPENAI_API_KEY"))
			.context("No scorer API key. Set BURST_SCORER_API_KEY or OPENAI_API_KEY")?;

		let base_url = std::env::var("BURST_SCORER_URL")
			.unwrap_or_else(|_| DEFAULT_SCORER_URL.to_string());
		let model = std::env::var("BURST_SCORER_MODEL")
			.unwrap_or_else(|_| DEFAULT_SCORER_MODEL.to_string());

		let timeout_secs = match std::env::var("BURST_SCORER_TIMEOUT_SECS") {
			Ok(raw) => raw
				.trim()
				.parse::<u64>()
				.with_context(|| format!("BURST_SCORER_TIMEOUT_SECS is not a number: {}", raw))?,
			Err(_) => DEFAULT_SCORER_TIMEOUT_SECS,
		};

		Ok(Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			model,
			api_key,
			timeout: Duration::from_secs(timeout_secs),
		})
	}
}
