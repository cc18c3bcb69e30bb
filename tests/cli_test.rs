// Smoke tests for the burst binary

use std::process::Command;

fn burst() -> Command {
	Command::new(env!("CARGO_BIN_EXE_burst"))
}

#[test]
fn test_version_display() {
	let output = burst().arg("--version").output().expect("Failed to run burst --version");

	assert!(output.status.success(), "Version command failed");
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("burst"), "Expected 'burst' in version output");
}

#[test]
fn test_help_display() {
	let output = burst().arg("--help").output().expect("Failed to run burst --help");

	assert!(output.status.success(), "Help command failed");
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(
		stdout.contains("group") && stdout.contains("pick"),
		"Expected group and pick in help output"
	);
}

#[test]
fn test_group_on_empty_folder_is_a_no_op() {
	let dir = tempfile::tempdir().unwrap();
	let output = burst()
		.args(["group", dir.path().to_str().unwrap()])
		.output()
		.expect("Failed to run burst group");

	assert!(output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("No photos found"));
}

#[test]
fn test_invalid_eps_is_rejected() {
	let output = burst()
		.args(["group", ".", "--eps", "2"])
		.output()
		.expect("Failed to run burst group");

	assert!(!output.status.success());
}

#[test]
fn test_pick_validates_before_looking_for_a_scorer() {
	let photos: Vec<String> = (0..11).map(|i| format!("/burst/{}.jpg", i)).collect();
	let output = burst()
		.arg("pick")
		.args(&photos)
		.env_remove("BURST_SCORER_API_KEY")
		.env_remove("OPENAI_API_KEY")
		.output()
		.expect("Failed to run burst pick");

	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("invalid request"), "unexpected error: {}", stderr);
	assert!(!stderr.contains("API key"));
}
