use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ogm::{DecodeError, Entity, EntityId, FromDecoded, PathStep, Value};

/// Destination value produced by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
	/// Absent value; also the zero value of interface and `any` destinations.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Integer scalar.
	Int(i64),
	/// Float scalar.
	Float(f64),
	/// String scalar.
	String(String),
	/// Decoded sequence.
	List(Vec<Decoded>),
	/// Decoded string-keyed mapping.
	Map(BTreeMap<String, Decoded>),
	/// Populated record.
	Record(RecordValue),
	/// Entity passed through an `any` destination.
	Entity(Entity),
}

/// Populated record with every declared field present.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
	/// Concrete type name.
	pub type_name: Arc<str>,
	/// Fields in declaration order, sentinels last.
	pub fields: Vec<FieldValue>,
}

/// One record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field name.
	pub name: Box<str>,
	/// Field value.
	pub value: Decoded,
}

impl Decoded {
	/// Logical kind name used in diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::Record(_) => "record",
			Self::Entity(_) => "entity",
		}
	}

	/// Unwrap a record or report a mismatch.
	pub fn into_record(self) -> Result<RecordValue, DecodeError> {
		match self {
			Self::Record(record) => Ok(record),
			other => Err(DecodeError::mismatch("record", other.kind_name())),
		}
	}

	/// Render as JSON; records carry their type under `$type`.
	pub fn to_json(&self) -> serde_json::Value {
		use serde_json::{Map, Value as Json, json};

		match self {
			Self::Null => Json::Null,
			Self::Bool(v) => json!(v),
			Self::Int(v) => json!(v),
			Self::Float(v) => json!(v),
			Self::String(v) => json!(v),
			Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
			Self::Map(items) => Json::Object(items.iter().map(|(key, value)| (key.clone(), value.to_json())).collect()),
			Self::Record(record) => {
				let mut out = Map::new();
				out.insert("$type".to_owned(), json!(record.type_name.as_ref()));
				for field in &record.fields {
					out.insert(field.name.to_string(), field.value.to_json());
				}
				Json::Object(out)
			}
			Self::Entity(entity) => json!({
				"$node": {
					"id": id_to_json(&entity.id),
					"labels": entity.labels,
					"properties": entity.properties.iter().map(|(key, value)| (key.clone(), Self::from(value.clone()).to_json())).collect::<Map<_, _>>(),
				}
			}),
		}
	}
}

impl From<Value> for Decoded {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(v) => Self::Bool(v),
			Value::Int(v) => Self::Int(v),
			Value::Float(v) => Self::Float(v),
			Value::String(v) => Self::String(v),
			Value::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
			Value::Map(items) => Self::Map(items.into_iter().map(|(key, value)| (key, Self::from(value))).collect()),
			Value::Entity(entity) => Self::Entity(entity),
		}
	}
}

impl From<&EntityId> for Decoded {
	fn from(value: &EntityId) -> Self {
		match value {
			EntityId::Legacy(id) => Self::Int(*id),
			EntityId::Element(id) => Self::String(id.clone()),
		}
	}
}

impl RecordValue {
	/// Borrow a field value by name.
	pub fn get(&self, name: &str) -> Option<&Decoded> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}

	/// Move a field value out, leaving `Null`; missing fields yield `Null`.
	pub fn take(&mut self, name: &str) -> Decoded {
		self.fields
			.iter_mut()
			.find(|field| field.name.as_ref() == name)
			.map(|field| std::mem::replace(&mut field.value, Decoded::Null))
			.unwrap_or(Decoded::Null)
	}

	/// Move a field out and convert it, annotating errors with the field name.
	pub fn field<T: FromDecoded>(&mut self, name: &str) -> Result<T, DecodeError> {
		T::from_decoded(self.take(name)).map_err(|err| err.within(PathStep::Field(name.to_owned())))
	}
}

fn id_to_json(id: &EntityId) -> serde_json::Value {
	match id {
		EntityId::Legacy(v) => serde_json::json!(v),
		EntityId::Element(v) => serde_json::json!(v),
	}
}
