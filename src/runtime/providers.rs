//! Execution provider selection

use anyhow::{Context, Result};
use clap::ValueEnum;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;
use std::sync::{Once, OnceLock};

use crate::ui;

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK (optimized CPU kernels)
	Xnnpack,
}

static SELECTED_PROVIDER: OnceLock<Provider> = OnceLock::new();
static PROVIDER_LOGGED: Once = Once::new();

pub fn set_provider(provider: Provider) {
	let _ = SELECTED_PROVIDER.set(provider);
}

fn get_provider() -> Provider {
	SELECTED_PROVIDER.get().copied().unwrap_or_default()
}

fn announce(msg: &str) {
	PROVIDER_LOGGED.call_once(|| ui::info(msg));
}

pub fn create_session(model_path: &Path) -> Result<Session> {
	let mut builder = Session::builder().context("Failed to create session builder")?;

	match get_provider() {
		Provider::Auto => register_best(&mut builder),
		Provider::Cpu => announce("Using CPU execution provider (forced)"),
		requested => {
			if !try_register(&mut builder, requested) {
				ui::error(&format!("{:?} requested but unavailable, falling back to CPU", requested));
			}
		}
	}

	builder
		.with_optimization_level(GraphOptimizationLevel::Level3)
		.context("Failed to set optimization level")?
		.with_intra_threads(4)
		.context("Failed to set thread count")?
		.commit_from_file(model_path)
		.context("Failed to load model")
}

fn register_best(builder: &mut SessionBuilder) {
	const ORDER: [Provider; 4] = [Provider::Tensorrt, Provider::Cuda, Provider::Coreml, Provider::Xnnpack];

	if ORDER.into_iter().any(|p| try_register(builder, p)) {
		return;
	}
	announce("Using CPU execution provider");
}

macro_rules! try_provider {
	($builder:expr, $provider_type:ty, $name:expr) => {{
		use ort::ep::ExecutionProvider;

		ui::debug(&format!("Trying provider: {}", $name));

		let provider = <$provider_type>::default();
		if !provider.is_available().unwrap_or(false) {
			ui::debug(&format!("{} not available", $name));
			return false;
		}

		match provider.register($builder) {
			Ok(_) => {
				announce(&format!("Using {} execution provider", $name));
				true
			}
			Err(e) => {
				ui::debug(&format!("{} registration failed: {}", $name, e));
				false
			}
		}
	}};
}

fn try_register(builder: &mut SessionBuilder, provider: Provider) -> bool {
	match provider {
		Provider::Cuda => try_cuda(builder),
		Provider::Tensorrt => try_tensorrt(builder),
		Provider::Coreml => try_coreml(builder),
		Provider::Xnnpack => try_xnnpack(builder),
		Provider::Auto | Provider::Cpu => false,
	}
}

#[cfg(any(target_os = "linux", target_os = "windows"))]
fn try_cuda(builder: &mut SessionBuilder) -> bool {
	try_provider!(builder, ort::ep::CUDA, "CUDA")
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn try_cuda(_builder: &mut SessionBuilder) -> bool {
	false
}

#[cfg(any(target_os = "linux", target_os = "windows"))]
fn try_tensorrt(builder: &mut SessionBuilder) -> bool {
	try_provider!(builder, ort::ep::TensorRT, "TensorRT")
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn try_tensorrt(_builder: &mut SessionBuilder) -> bool {
	false
}

#[cfg(target_os = "macos")]
fn try_coreml(builder: &mut SessionBuilder) -> bool {
	try_provider!(builder, ort::ep::CoreML, "CoreML")
}

#[cfg(not(target_os = "macos"))]
fn try_coreml(_builder: &mut SessionBuilder) -> bool {
	ui::debug("CoreML only available on macOS");
	false
}

#[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
fn try_xnnpack(builder: &mut SessionBuilder) -> bool {
	try_provider!(builder, ort::ep::XNNPACK, "XNNPACK")
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn try_xnnpack(_builder: &mut SessionBuilder) -> bool {
	false
}
