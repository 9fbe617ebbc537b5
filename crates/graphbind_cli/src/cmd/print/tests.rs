use std::collections::BTreeMap;
use std::sync::Arc;

use graphbind::ogm::{Decoded, Entity, FieldValue, RecordValue};

use super::{PrintOptions, render_value};

fn person(name: &str) -> Decoded {
	Decoded::Record(RecordValue {
		type_name: Arc::from("Person"),
		fields: vec![
			FieldValue {
				name: "name".into(),
				value: Decoded::String(name.into()),
			},
			FieldValue {
				name: "tags".into(),
				value: Decoded::Map(BTreeMap::from([("k".to_owned(), Decoded::Int(1))])),
			},
		],
	})
}

#[test]
fn records_render_with_nested_containers() {
	let text = render_value(&Decoded::List(vec![person("Ann"), Decoded::Null]), 0, PrintOptions::default());
	let expected = "[\n  Person {\n    name = \"Ann\"\n    tags = \n      {\n        \"k\" = 1\n      }\n  }\n  null\n]\n";
	assert_eq!(text, expected);
}

#[test]
fn long_lists_and_strings_are_truncated() {
	let options = PrintOptions {
		max_string_len: 3,
		max_list_items: 2,
		..PrintOptions::default()
	};
	let items = Decoded::List(vec![Decoded::String("abcdef".into()), Decoded::Int(2), Decoded::Int(3)]);

	let text = render_value(&items, 0, options);
	assert_eq!(text, "[\n  \"abc...\"\n  2\n  ... 1 more\n]\n");
}

#[test]
fn depth_limit_collapses_records() {
	let options = PrintOptions {
		max_print_depth: 1,
		..PrintOptions::default()
	};
	let text = render_value(&Decoded::List(vec![person("Ann")]), 0, options);
	assert_eq!(text, "[\n  Person { ... }\n]\n");
}

#[test]
fn entities_render_as_summary() {
	let entity = Entity::new("4:abc:1", ["Person", "Human"]).with_property("name", "Ann");
	let text = render_value(&Decoded::Entity(entity), 2, PrintOptions::default());
	assert_eq!(text, "  (\"4:abc:1\":Human:Person) 1 properties\n");
}
