//! Burst - group similar photos and pick the best shot

use anyhow::Result;
use clap::Parser;

use burst::cli::{Cli, Command};
use burst::{commands, config, runtime, ui};

fn main() {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);

	if let Err(e) = run(cli) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run(cli: Cli) -> Result<()> {
	runtime::set_provider(cli.provider);
	if let Some(dir) = cli.models {
		config::set_model_dir(dir);
	}
	if let Some(path) = cli.vision_model {
		config::set_vision_model(path);
	}

	match cli.command {
		Command::Group {
			paths,
			recursive,
			eps,
			min_pts,
			pick,
			preview,
			export,
		} => {
			if export.is_none() {
				ui::print_logo();
			}
			commands::group::run(&paths, recursive, eps, min_pts, pick, preview, export.as_deref())
		}
		Command::Pick { photos, export } => commands::pick::run(&photos, export.as_deref()),
	}
}
