#![allow(missing_docs)]

use std::sync::Arc;

use graphbind::ogm::{
	ConfigError, DecodeErrorKind, DecodeOptions, Decoded, Describer, OgmError, Registry, ResultBinder, Shape, TypeSet, label_set, rows_from_json,
};
use graphbind_testkit::{fixture_path, read_json};

fn registry() -> Arc<Registry> {
	let set = TypeSet::load(fixture_path("humans.schema.json")).expect("schema loads");
	Arc::new(Registry::build(&set).expect("registry builds"))
}

#[test]
fn schema_fixture_builds_flattened_hierarchy() {
	let registry = registry();
	let living = registry.abstract_by_name("Living").expect("living registered");
	let names: Vec<&str> = living.implementers.iter().map(|id| registry.record(*id).name.as_ref()).collect();
	assert_eq!(names, vec!["Person", "Child", "Pet"]);

	let person = registry.record_by_name("Person").expect("person registered");
	assert_eq!(person.labels, label_set(["Human", "Living", "Person"]));

	let address = registry.record_by_name("Address").expect("address registered");
	assert!(address.labels.is_empty());
}

#[test]
fn resolve_labels_prefers_most_specific_record() {
	let registry = registry();
	let hit = registry.resolve_labels(&label_set(["Living", "Human", "Child", "Extra"])).expect("child resolves");
	assert_eq!(hit.name.as_ref(), "Child");
	assert!(registry.resolve_labels(&label_set(["Human"])).is_none());
}

#[test]
fn nested_rows_fixture_decodes_grid() {
	let describer = Describer::new(registry());
	let rows = rows_from_json(read_json("nested_rows.json")).expect("rows parse");
	let mut binder = ResultBinder::new(&describer, DecodeOptions::default());
	binder.bind("p", &Shape::parse("[[Human]]").expect("shape parses")).expect("p binds");
	binder.bind("count", &Shape::int()).expect("count binds");

	let bound = binder.decode_row(&rows[0]).expect("row decodes");
	assert_eq!(bound.get::<i64>("count").expect("count converts"), 4);

	let json = bound.decoded("p").expect("p decoded").to_json();
	assert_eq!(json[0][0]["$type"], "Person");
	assert_eq!(json[0][0]["is_alive"], true);
	assert_eq!(json[0][0]["address"]["street"], "");
	assert_eq!(json[0][1]["$type"], "Child");
	assert_eq!(json[0][1]["labels"], serde_json::json!(["Child", "Human", "Living"]));
	assert_eq!(json[1][0], serde_json::Value::Null);
	assert_eq!(json[1][1]["surname"], "");
	assert_eq!(json[1][1]["address"]["tags"]["kind"], "inn");
	assert_eq!(json[1][1]["id"], 4);
}

#[test]
fn projected_rows_fixture_uses_side_channel() {
	let describer = Describer::new(registry());
	let rows = rows_from_json(read_json("projected_rows.json")).expect("rows parse");
	let mut binder = ResultBinder::new(&describer, DecodeOptions::default());
	binder.bind("p", &Shape::named("Living")).expect("p binds");

	let first = binder.decode_row(&rows[0]).expect("labelled map decodes");
	let Some(Decoded::Record(child)) = first.decoded("p") else {
		panic!("expected child record");
	};
	assert_eq!(child.type_name.as_ref(), "Child");
	assert_eq!(child.get("id"), Some(&Decoded::String("c-7".into())));

	let err = binder.decode_row(&rows[1]).expect_err("robot rejected");
	assert!(matches!(err.kind, DecodeErrorKind::UnresolvedPolymorphicType { .. }));
	assert_eq!(err.path.to_string(), "p");

	let err = binder.decode_row(&rows[2]).expect_err("labels required");
	assert!(matches!(err.kind, DecodeErrorKind::MissingLabels { .. }));

	let mut lenient = ResultBinder::new(&describer, DecodeOptions::skip_unresolved());
	lenient.bind("p", &Shape::named("Living")).expect("p binds");
	let bound = lenient.decode_rows(&rows, &Default::default()).expect("skip tolerates");
	assert_eq!(bound.iter().map(|row| row.skipped.len()).sum::<usize>(), 2);
	assert_eq!(bound[2].decoded("p"), Some(&Decoded::Null));
}

#[test]
fn cyclic_schema_fixture_is_rejected() {
	let set = TypeSet::load(fixture_path("cycle.schema.json")).expect("schema loads");
	let err = Registry::build(&set).expect_err("cycle rejected");
	assert_eq!(
		err,
		ConfigError::Cycle {
			path: vec!["A".into(), "B".into(), "A".into()],
		}
	);
	assert_eq!(OgmError::from(err).to_string(), "config: cyclic embedding: A -> B -> A");
}
