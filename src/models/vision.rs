//! Vision model (CLIP image encoder) for photo embeddings

use anyhow::{Context, Result};
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;

use crate::config::{self, CLIP_MEAN, CLIP_STD, EMBEDDING_DIM, INPUT_SIZE};
use crate::core::Embedding;
use crate::models::Extractor;

pub struct VisionModel {
	session: Mutex<Session>,
}

impl VisionModel {
	pub fn load(model_path: &Path) -> Result<Self> {
		if !model_path.exists() {
			anyhow::bail!("Vision model file does not exist: {}", model_path.display());
		}
		let session = crate::runtime::create_session(model_path)
			.context("Failed to load vision model")?;
		Ok(Self { session: Mutex::new(session) })
	}

	/// Load from the configured models directory
	pub fn from_config() -> Result<Self> {
		let path = config::get_vision_model_path().context(format!(
			"Vision model not found. Ensure {} exists or pass --models",
			config::VISION_MODEL
		))?;
		crate::ui::debug(&format!("Loading vision model: {}", path.display()));
		Self::load(&path)
	}

	pub fn encode(&self, image: &image::DynamicImage) -> Result<Embedding> {
		let pixels = preprocess(image);
		let input = ort::value::Value::from_array(pixels)?;

		let mut session = self
			.session
			.lock()
			.map_err(|e| anyhow::anyhow!("Session lock: {}", e))?;
		let outputs = session.run(ort::inputs!["pixel_values" => input])?;
		let embedding = extract_embedding(&outputs)?;

		Ok(Embedding::new(embedding))
	}
}

impl Extractor for VisionModel {
	fn extract(&self, path: &Path) -> Result<Embedding> {
		let img = image::open(path).with_context(|| {
			format!(
				"Failed to open image. File may be corrupted or in an unsupported format: {}",
				path.display()
			)
		})?;
		self.encode(&img)
	}
}

fn preprocess(img: &image::DynamicImage) -> (Vec<usize>, Vec<f32>) {
	use image::imageops::FilterType;

	let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);
	let rgb = resized.to_rgb8();
	let size = INPUT_SIZE as usize;
	let plane = size * size;

	let shape = vec![1, 3, size, size];
	let mut data = vec![0.0f32; 3 * plane];

	for (x, y, px) in rgb.enumerate_pixels() {
		let idx = y as usize * size + x as usize;
		for c in 0..3 {
			data[c * plane + idx] = (px[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c];
		}
	}

	(shape, data)
}

fn extract_embedding(outputs: &ort::session::SessionOutputs) -> Result<Vec<f32>> {
	let output = outputs
		.get("image_embeds")
		.or_else(|| outputs.get("pooler_output"))
		.context("No image embedding output found")?;

	let (shape, data) = output.try_extract_tensor::<f32>()?;
	let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

	match dims.as_slice() {
		[1, dim] if *dim == EMBEDDING_DIM => Ok(data.to_vec()),
		[1, n, dim] if *dim == EMBEDDING_DIM && *n > 0 => {
			// Mean pooling over tokens
			let mut pooled = vec![0.0; *dim];
			for token in data.chunks_exact(*dim) {
				for (acc, v) in pooled.iter_mut().zip(token) {
					*acc += v;
				}
			}
			pooled.iter_mut().for_each(|v| *v /= *n as f32);
			Ok(pooled)
		}
		_ => anyhow::bail!("Unexpected embedding output shape: {:?}", dims),
	}
}
