//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read and parse a JSON fixture, panicking with the fixture name on failure.
pub fn read_json(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let text = std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("read fixture {}: {err}", path.display()));
	serde_json::from_str(&text).unwrap_or_else(|err| panic!("parse fixture {}: {err}", path.display()))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Path of a workspace binary.
///
/// `built` is the harness-provided `CARGO_BIN_EXE_<name>` when available; otherwise the
/// binary is built into the workspace target directory first.
pub fn workspace_bin(name: &str, built: Option<&str>) -> PathBuf {
	if let Some(path) = built {
		return PathBuf::from(path);
	}

	let status = Command::new("cargo")
		.current_dir(workspace_root())
		.args(["build", "--quiet", "--bin", name])
		.status()
		.unwrap_or_else(|err| panic!("cargo build --bin {name}: {err}"));
	assert!(status.success(), "failed to build {name}");

	let file = if cfg!(windows) { format!("{name}.exe") } else { name.to_owned() };
	target_dir().join("debug").join(file)
}

/// Run `bin` with `args`. `RUST_LOG` is cleared so stderr reflects only the flags passed.
pub fn run_bin(bin: &Path, args: &[&str]) -> Output {
	Command::new(bin)
		.args(args)
		.env_remove("RUST_LOG")
		.output()
		.unwrap_or_else(|err| panic!("run {}: {err}", bin.display()))
}

/// Run `bin` expecting success and parse its stdout as JSON.
pub fn run_bin_json(bin: &Path, args: &[&str]) -> serde_json::Value {
	let output = run_bin(bin, args);
	assert!(
		output.status.success(),
		"{} {args:?} exited with {}: {}",
		bin.display(),
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).unwrap_or_else(|err| panic!("stdout of {args:?} is not json: {err}"))
}
