use crate::cmd::test_support::{fixture_path, run_graphbind, run_graphbind_json};

fn schema() -> String {
	fixture_path("humans.schema.json").to_string_lossy().into_owned()
}

#[test]
fn first_matching_implementer_wins() {
	let json = run_graphbind_json(&["resolve", &schema(), "--labels", "Living,Human,Person,Pet", "--type", "Living", "--json"]);

	assert_eq!(json["candidates"], serde_json::json!(["Person", "Child", "Pet"]));
	assert_eq!(json["resolved"], "Person");
	assert_eq!(json["full_labels"], serde_json::json!(["Human", "Living", "Person"]));
}

#[test]
fn abstract_label_alone_does_not_resolve() {
	let json = run_graphbind_json(&["resolve", &schema(), "--labels", "Living,Human", "--type", "Human", "--json"]);
	assert_eq!(json["resolved"], serde_json::Value::Null);
}

#[test]
fn registry_wide_lookup_picks_most_specific_record() {
	let json = run_graphbind_json(&["resolve", &schema(), "--labels", "Child, Human, Living, Extra", "--json"]);
	assert_eq!(json["labels"], serde_json::json!(["Child", "Extra", "Human", "Living"]));
	assert_eq!(json["resolved"], "Child");
}

#[test]
fn text_output_reports_unresolved() {
	let output = run_graphbind(&["resolve", &schema(), "--labels", "Robot"]);
	assert!(output.status.success());
	assert!(String::from_utf8_lossy(&output.stdout).contains("resolved: -"));
}
