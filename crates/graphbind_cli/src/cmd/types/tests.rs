use crate::cmd::test_support::{fixture_path, run_graphbind, run_graphbind_json};

fn schema() -> String {
	fixture_path("humans.schema.json").to_string_lossy().into_owned()
}

#[test]
fn types_json_lists_flattened_implementers() {
	let json = run_graphbind_json(&["types", &schema(), "--json"]);

	let living = json["abstracts"]
		.as_array()
		.and_then(|items| items.iter().find(|item| item["name"] == "Living"))
		.expect("living listed");
	assert_eq!(living["declared"], serde_json::json!(["Human", "Pet"]));
	assert_eq!(living["implementers"], serde_json::json!(["Person", "Child", "Pet"]));
	assert_eq!(json["records"].as_array().map(Vec::len), Some(4));
}

#[test]
fn types_json_filters_to_one_record() {
	let json = run_graphbind_json(&["types", &schema(), "--type", "Person", "--json"]);

	assert_eq!(json["abstracts"], serde_json::json!([]));
	let person = &json["records"][0];
	assert_eq!(person["labels"], serde_json::json!(["Human", "Living", "Person"]));
	assert_eq!(person["fields"][3]["property"], "isAlive");
	assert_eq!(person["fields"][4]["shape"], "Address");
	assert_eq!(person["id_field"], "id");
}

#[test]
fn types_text_output_shows_field_layout() {
	let output = run_graphbind(&["types", &schema(), "--type", "Child"]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("record Child [Child,Human,Living]"), "{stdout}");
	assert!(stdout.contains("  toys: [string]"), "{stdout}");
	assert!(stdout.contains("  labels: <labels>"), "{stdout}");
}

#[test]
fn unknown_type_filter_fails() {
	let output = run_graphbind(&["types", &schema(), "--type", "Robot"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("no registered type named Robot"));
}

#[test]
fn cyclic_schema_is_reported() {
	let schema = fixture_path("cycle.schema.json").to_string_lossy().into_owned();
	let output = run_graphbind(&["types", &schema]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("cyclic embedding: A -> B -> A"));
}
