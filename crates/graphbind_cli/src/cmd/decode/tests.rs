use crate::cmd::test_support::{fixture_path, run_graphbind, run_graphbind_json};

fn path(name: &str) -> String {
	fixture_path(name).to_string_lossy().into_owned()
}

#[test]
fn nested_grid_decodes_to_json() {
	let json = run_graphbind_json(&[
		"decode",
		&path("humans.schema.json"),
		&path("nested_rows.json"),
		"--bind",
		"p=[[Human]]",
		"--bind",
		"count=int",
		"--json",
	]);

	let row = &json["rows"][0];
	assert_eq!(row["columns"]["count"], 4);
	assert_eq!(row["columns"]["p"][0][0]["$type"], "Person");
	assert_eq!(row["columns"]["p"][0][0]["id"], 1);
	assert_eq!(row["columns"]["p"][0][1]["toys"], serde_json::json!(["gear"]));
	assert_eq!(row["columns"]["p"][1][0], serde_json::Value::Null);
	assert_eq!(row["skipped"], serde_json::json!([]));
}

#[test]
fn unresolved_row_fails_with_path() {
	let output = run_graphbind(&["decode", &path("humans.schema.json"), &path("projected_rows.json"), "--bind", "p=Human"]);
	assert!(!output.status.success());

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("decode error at p: no implementer of Human matches labels [\"Robot\"]"), "{stderr}");
}

#[test]
fn skip_unresolved_reports_skipped_elements() {
	let json = run_graphbind_json(&[
		"decode",
		&path("humans.schema.json"),
		&path("projected_rows.json"),
		"--bind",
		"p=Human",
		"--skip-unresolved",
		"--json",
	]);

	let rows = json["rows"].as_array().expect("rows array");
	assert_eq!(rows.len(), 3);
	assert_eq!(rows[0]["columns"]["p"]["$type"], "Child");
	assert_eq!(rows[0]["columns"]["p"]["id"], "c-7");
	assert_eq!(rows[1]["columns"]["p"], serde_json::Value::Null);
	assert_eq!(rows[1]["skipped"][0]["path"], "p");
	assert_eq!(rows[2]["skipped"][0]["error"], "map bound to Human has no __labels entry");
}

#[test]
fn text_output_prints_value_tree() {
	let output = run_graphbind(&["decode", &path("humans.schema.json"), &path("nested_rows.json"), "--bind", "count=int"]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("rows: 1"), "{stdout}");
	assert!(stdout.contains("  count (int):\n    4\n"), "{stdout}");
}

#[test]
fn malformed_binding_is_rejected() {
	let output = run_graphbind(&["decode", &path("humans.schema.json"), &path("nested_rows.json"), "--bind", "Human"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("invalid binding Human (expected ALIAS=SHAPE)"));
}

#[test]
fn depth_limit_flag_is_applied() {
	let output = run_graphbind(&[
		"decode",
		&path("humans.schema.json"),
		&path("nested_rows.json"),
		"--bind",
		"p=[[Human]]",
		"--max-depth",
		"1",
	]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("decode depth exceeded (max=1)"));
}
