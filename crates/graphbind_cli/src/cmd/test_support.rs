use std::path::PathBuf;
use std::process::Output;
use std::sync::OnceLock;

pub(crate) use graphbind_testkit::fixture_path;
use graphbind_testkit::{run_bin, run_bin_json, workspace_bin};

static GRAPHBIND_BIN: OnceLock<PathBuf> = OnceLock::new();

fn graphbind_bin() -> &'static PathBuf {
	GRAPHBIND_BIN.get_or_init(|| workspace_bin("graphbind", option_env!("CARGO_BIN_EXE_graphbind")))
}

pub(crate) fn run_graphbind(args: &[&str]) -> Output {
	run_bin(graphbind_bin(), args)
}

pub(crate) fn run_graphbind_json(args: &[&str]) -> serde_json::Value {
	run_bin_json(graphbind_bin(), args)
}
