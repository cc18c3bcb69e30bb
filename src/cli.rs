use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_EPS, DEFAULT_MIN_PTS};
use crate::runtime::Provider;

fn parse_eps(s: &str) -> Result<f64, String> {
	let val: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=1.0).contains(&val) {
		Err(format!("eps must be between 0.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.usage(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.literal(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.placeholder(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
		.valid(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
}

#[derive(Parser, Debug)]
#[command(
	name = "burst",
	author,
	version,
	about = "Group similar photos and pick the best shot",
	styles = styles(),
	after_help = format!(
		"{title}
  {burst} {group} {group_args}          {group_desc}
  {burst} {group} {pick_args}   {pick_desc}
  {burst} {pick}  {pick_files}  {pick_files_desc}",
		title = "Examples:".bright_blue().bold(),
		burst = "burst".bright_blue(),
		group = "group".yellow(),
		group_args = "./holiday -r",
		group_desc = "Group similar photos".dimmed(),
		pick_args = "./holiday --pick",
		pick_desc = "Group and choose a keeper per group".dimmed(),
		pick = "pick".yellow(),
		pick_files = "a.jpg b.jpg c.jpg",
		pick_files_desc = "Best of a few shots".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	/// Directory containing the ONNX models
	#[arg(long = "models", global = true, value_name = "DIR")]
	pub models: Option<PathBuf>,

	/// Path to the vision model file
	#[arg(long = "vision-model", global = true, value_name = "FILE")]
	pub vision_model: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Group photos by visual similarity
	Group {
		/// Photos or directories of photos
		#[arg(value_name = "PATHS", required = true)]
		paths: Vec<PathBuf>,

		/// Descend into subdirectories
		#[arg(short = 'r', long = "recursive")]
		recursive: bool,

		/// Maximum cosine distance between neighbors (0.0-1.0)
		#[arg(short = 'e', long = "eps", default_value_t = DEFAULT_EPS, value_parser = parse_eps)]
		eps: f64,

		/// Photos needed in a neighborhood to start a group
		#[arg(short = 'm', long = "min-pts", default_value_t = DEFAULT_MIN_PTS)]
		min_pts: usize,

		/// Pick the best photo of every group with the quality scorer
		#[arg(long = "pick")]
		pick: bool,

		/// Photos listed per group
		#[arg(short = 'n', long = "preview", default_value_t = 5)]
		preview: usize,

		/// Write JSON results to a file ('-' for stdout)
		#[arg(long = "export", value_name = "FILE")]
		export: Option<PathBuf>,
	},

	/// Pick the best of up to 10 photos
	Pick {
		/// Photos to compare
		#[arg(value_name = "PHOTOS", required = true)]
		photos: Vec<PathBuf>,

		/// Write JSON results to a file ('-' for stdout)
		#[arg(long = "export", value_name = "FILE")]
		export: Option<PathBuf>,
	},
}
