#![allow(missing_docs)]

use std::path::Path;

use graphbind_testkit::{fixture_path, run_bin, run_bin_json};
use serde_json::Value;

fn run_json(args: &[&str]) -> Value {
	run_bin_json(Path::new(env!("CARGO_BIN_EXE_graphbind")), args)
}

#[test]
fn types_and_resolve_agree_on_label_sets() {
	let schema = fixture_path("humans.schema.json").display().to_string();

	let types = run_json(&["types", &schema, "--type", "Child", "--json"]);
	let labels: Vec<String> = types["records"][0]["labels"]
		.as_array()
		.expect("labels array")
		.iter()
		.filter_map(|item| item.as_str().map(str::to_owned))
		.collect();

	let resolved = run_json(&["resolve", &schema, "--labels", &labels.join(","), "--type", "Living", "--json"]);
	assert_eq!(resolved["resolved"], "Child");
}

#[test]
fn verbose_flag_emits_registry_debug_logs() {
	let schema = fixture_path("humans.schema.json").display().to_string();
	let output = run_bin(Path::new(env!("CARGO_BIN_EXE_graphbind")), &["--verbose", "types", &schema]);

	assert!(output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("type registry built: 4 records, 2 abstract types"));
}

#[test]
fn decode_json_is_structured_per_row() {
	let json = run_json(&[
		"decode",
		&fixture_path("humans.schema.json").display().to_string(),
		&fixture_path("nested_rows.json").display().to_string(),
		"--bind",
		"p=[[Living]]",
		"--json",
	]);

	let grid = &json["rows"][0]["columns"]["p"];
	assert_eq!(grid[1][1]["$type"], "Person");
	assert_eq!(grid[1][1]["address"]["street"], "Imre");
}
