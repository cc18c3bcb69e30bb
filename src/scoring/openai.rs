//! OpenAI-compatible multimodal scorer

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::{ScorerConfig, SCORER_MAX_EDGE};
use crate::scoring::Scorer;
use crate::ui;

const SYSTEM_PROMPT: &str = r#"You are a photo editor choosing the best shot from a burst of similar photos.
Rate every photo from 0 to 100 on sharpness, brightness and composition.
If people are visible, rate faceScore from 0 to 100 (expressions, eyes, framing), report faceCount and whether allEyesOpen.
Give each photo a finalScore from 0 to 100 and a one-sentence reasoning.
Answer with a single JSON object and nothing else:
{"perPhoto": [{"sharpness": n, "brightness": n, "composition": n, "faceScore": n, "allEyesOpen": bool, "faceCount": n, "reasoning": "...", "finalScore": n}],
 "bestIndex": n, "bestReasoning": "..."}
perPhoto must follow the order of the photos; bestIndex is zero-based."#;

pub struct OpenAiScorer {
	client: Client,
	config: ScorerConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
	choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
	message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
	content: Option<String>,
}

impl OpenAiScorer {
	pub fn new(config: ScorerConfig) -> Result<Self> {
		let client = Client::builder()
			.timeout(config.timeout)
			.build()
			.context("Failed to build HTTP client")?;
		Ok(Self { client, config })
	}

	pub fn from_env() -> Result<Self> {
		Self::new(ScorerConfig::from_env()?)
	}
}

impl Scorer for OpenAiScorer {
	fn score(&self, paths: &[PathBuf]) -> Result<String> {
		let mut content = vec![json!({
			"type": "text",
			"text": format!("Rate these {} photos, numbered 0 to {}.", paths.len(), paths.len().saturating_sub(1)),
		})];
		for (i, path) in paths.iter().enumerate() {
			content.push(json!({ "type": "text", "text": format!("Photo {}:", i) }));
			content.push(json!({
				"type": "image_url",
				"image_url": { "url": data_url(path)? },
			}));
		}

		let body = json!({
			"model": self.config.model,
			"temperature": 0.2,
			"response_format": { "type": "json_object" },
			"messages": [
				{ "role": "system", "content": SYSTEM_PROMPT },
				{ "role": "user", "content": content },
			],
		});

		ui::debug(&format!("Scoring {} photos with {}", paths.len(), self.config.model));

		let response = self
			.client
			.post(format!("{}/chat/completions", self.config.base_url))
			.bearer_auth(&self.config.api_key)
			.json(&body)
			.send()
			.context("Scorer request failed")?;

		let status = response.status();
		if !status.is_success() {
			let text = response.text().unwrap_or_default();
			anyhow::bail!("Scorer returned {}: {}", status, text.chars().take(300).collect::<String>());
		}

		let reply: ChatResponse = response.json().context("Scorer reply is not a chat completion")?;
		reply
			.choices
			.into_iter()
			.next()
			.and_then(|c| c.message.content)
			.context("Scorer reply has no content")
	}
}

/// Downscaled JPEG as a base64 data URL
fn data_url(path: &Path) -> Result<String> {
	let img = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
	let (w, h) = img.dimensions();
	let img = if w.max(h) > SCORER_MAX_EDGE {
		img.thumbnail(SCORER_MAX_EDGE, SCORER_MAX_EDGE)
	} else {
		img
	};

	let mut buf = Vec::new();
	DynamicImage::ImageRgb8(img.to_rgb8())
		.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
		.with_context(|| format!("Failed to encode {}", path.display()))?;

	let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
	Ok(format!("data:image/jpeg;base64,{}", b64))
}
