use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ogm::{
	AbstractDecl, DecodeError, DecodeErrorKind, DecodeOptions, Decoded, Describer, Destination, Entity, FromDecoded, OgmError, RecordDecl, Registry, Shape,
	TypeSet, Value, decode_into,
};

#[derive(Debug, PartialEq)]
struct Person {
	name: String,
	age: u32,
	id: Option<i64>,
}

impl FromDecoded for Person {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		let mut record = value.into_record()?;
		Ok(Self {
			name: record.field("name")?,
			age: record.field("age")?,
			id: record.field("id")?,
		})
	}
}

impl Destination for Person {
	fn shape() -> Shape {
		Shape::named("Person")
	}
}

#[derive(Debug, PartialEq)]
enum Human {
	Person(Person),
	Child { name: String },
}

impl FromDecoded for Human {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		let mut record = value.into_record()?;
		let type_name = Arc::clone(&record.type_name);
		match type_name.as_ref() {
			"Child" => Ok(Self::Child { name: record.field("name")? }),
			_ => Person::from_decoded(Decoded::Record(record)).map(Self::Person),
		}
	}
}

impl Destination for Human {
	fn shape() -> Shape {
		Shape::named("Human")
	}
}

fn describer() -> Describer {
	let set = TypeSet::new()
		.with(AbstractDecl::new("Human", "Human").implementer("Person").implementer("Child"))
		.with(RecordDecl::new("Person").label("Person").field("name", Shape::string()).field("age", Shape::int()).id_field("id"))
		.with(RecordDecl::new("Child").label("Child").field("name", Shape::string()));
	Describer::new(Arc::new(Registry::build(&set).expect("registry builds")))
}

fn person(id: i64, name: &str, age: i64) -> Value {
	Value::Entity(Entity::new(id, ["Human", "Person"]).with_property("name", name).with_property("age", age))
}

fn child(id: i64, name: &str) -> Value {
	Value::Entity(Entity::new(id, ["Human", "Child"]).with_property("name", name))
}

#[test]
fn host_record_decodes_from_entity() {
	let describer = describer();

	let got: Person = decode_into(&describer, DecodeOptions::default(), &person(7, "Ann", 31)).expect("decode succeeds");
	assert_eq!(
		got,
		Person {
			name: "Ann".into(),
			age: 31,
			id: Some(7),
		}
	);
}

#[test]
fn nested_optional_interfaces_decode_into_host_enum() {
	let describer = describer();
	let grid = Value::List(vec![Value::List(vec![person(1, "A", 40), child(2, "B")]), Value::List(vec![Value::Null])]);

	let got: Vec<Vec<Option<Human>>> = decode_into(&describer, DecodeOptions::default(), &grid).expect("decode succeeds");
	assert_eq!(
		got,
		vec![
			vec![
				Some(Human::Person(Person {
					name: "A".into(),
					age: 40,
					id: Some(1),
				})),
				Some(Human::Child { name: "B".into() }),
			],
			vec![None],
		]
	);
}

#[test]
fn host_maps_collect_decoded_entries() {
	let describer = describer();
	let value = Value::map([("a", Value::Int(1)), ("b", Value::Int(2))]);

	let got: BTreeMap<String, i32> = decode_into(&describer, DecodeOptions::default(), &value).expect("decode succeeds");
	assert_eq!(got, BTreeMap::from([("a".to_owned(), 1), ("b".to_owned(), 2)]));
}

#[test]
fn narrowing_failure_names_the_field() {
	let describer = describer();

	let err = decode_into::<Vec<Person>>(&describer, DecodeOptions::default(), &Value::List(vec![person(1, "A", -3)])).expect_err("negative age rejected");
	let OgmError::Decode(err) = err else {
		panic!("expected decode error");
	};
	assert_eq!(err.path.to_string(), "[0].age");
	assert_eq!(
		err.kind,
		DecodeErrorKind::TypeMismatch {
			expected: "u32",
			found: "int out of range"
		}
	);
}

#[test]
fn unresolved_element_surfaces_as_decode_error() {
	let describer = describer();
	let robot = Value::Entity(Entity::new(9_i64, ["Robot"]));

	let err = decode_into::<Vec<Option<Human>>>(&describer, DecodeOptions::default(), &Value::List(vec![child(1, "C"), robot])).expect_err("robot rejected");
	assert!(matches!(err, OgmError::Decode(DecodeError { kind: DecodeErrorKind::UnresolvedPolymorphicType { .. }, .. })));
}

#[test]
fn skipped_elements_become_none() {
	let describer = describer();
	let robot = Value::Entity(Entity::new(9_i64, ["Robot"]));

	let got: Vec<Option<Human>> = decode_into(&describer, DecodeOptions::skip_unresolved(), &Value::List(vec![robot, child(1, "C")])).expect("skip tolerates");
	assert_eq!(got, vec![None, Some(Human::Child { name: "C".into() })]);
}

#[test]
fn record_destination_rejects_scalars() {
	let describer = describer();

	let err = decode_into::<Person>(&describer, DecodeOptions::default(), &Value::Int(3)).expect_err("scalar is not a record");
	assert!(matches!(
		err,
		OgmError::Decode(DecodeError {
			kind: DecodeErrorKind::TypeMismatch {
				expected: "record",
				found: "int"
			},
			..
		})
	));
}

#[test]
fn descriptors_resolve_against_their_own_registry() {
	// Human sits behind unrelated types, so its table index differs from a smaller schema.
	let set = TypeSet::new()
		.with(AbstractDecl::new("Thing", "Thing").implementer("Filler"))
		.with(RecordDecl::new("Filler").label("Filler").field("weight", Shape::int()))
		.with(AbstractDecl::new("Human", "Human").implementer("Person").implementer("Child"))
		.with(RecordDecl::new("Person").label("Person").field("name", Shape::string()).field("age", Shape::int()).id_field("id"))
		.with(RecordDecl::new("Child").label("Child").field("name", Shape::string()));
	let describer = Describer::new(Arc::new(Registry::build(&set).expect("registry builds")));

	let got: Vec<Human> = decode_into(&describer, DecodeOptions::default(), &Value::List(vec![child(1, "C"), person(2, "P", 9)])).expect("decode succeeds");
	assert_eq!(
		got,
		vec![
			Human::Child { name: "C".into() },
			Human::Person(Person {
				name: "P".into(),
				age: 9,
				id: Some(2),
			}),
		]
	);
}
