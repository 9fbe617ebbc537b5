use std::collections::{BTreeMap, BTreeSet};

use crate::ogm::{OgmError, Result};

/// String-keyed property map carried by maps and entities.
pub type PropertyMap = BTreeMap<String, Value>;

/// One result row: column alias to cell value.
pub type Row = BTreeMap<String, Value>;

/// JSON key marking an encoded graph entity.
pub const NODE_JSON_KEY: &str = "$node";

/// Opaque identity of a graph entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
	/// Legacy integer id.
	Legacy(i64),
	/// String element id.
	Element(String),
}

impl From<i64> for EntityId {
	fn from(value: i64) -> Self {
		Self::Legacy(value)
	}
}

impl From<&str> for EntityId {
	fn from(value: &str) -> Self {
		Self::Element(value.to_owned())
	}
}

impl From<String> for EntityId {
	fn from(value: String) -> Self {
		Self::Element(value)
	}
}

/// Graph node as returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
	/// Entity identity.
	pub id: EntityId,
	/// Label set, case-sensitive.
	pub labels: BTreeSet<String>,
	/// Property map.
	pub properties: PropertyMap,
}

impl Entity {
	/// Create an entity with no properties.
	pub fn new<I, S>(id: impl Into<EntityId>, labels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			id: id.into(),
			labels: label_set(labels),
			properties: PropertyMap::new(),
		}
	}

	/// Add one property.
	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}
}

/// Dynamically typed query result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absent value.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Integer scalar.
	Int(i64),
	/// Floating point scalar.
	Float(f64),
	/// String scalar.
	String(String),
	/// Ordered sequence.
	List(Vec<Value>),
	/// Property map without graph identity.
	Map(PropertyMap),
	/// Graph entity with identity and labels.
	Entity(Entity),
}

impl Value {
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
			Self::Entity(_) => "entity",
		}
	}

	/// Build a map value from key/value pairs.
	pub fn map<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		Self::Map(entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}

	/// Convert JSON into a dynamic value.
	///
	/// An object whose only key is `$node` encodes an entity:
	/// `{"$node": {"id": 1, "labels": ["A"], "properties": {...}}}`.
	pub fn from_json(json: serde_json::Value) -> Result<Self> {
		use serde_json::Value as Json;

		Ok(match json {
			Json::Null => Self::Null,
			Json::Bool(v) => Self::Bool(v),
			Json::Number(n) => match n.as_i64() {
				Some(v) => Self::Int(v),
				None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			Json::String(v) => Self::String(v),
			Json::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect::<Result<_>>()?),
			Json::Object(mut object) => {
				if object.len() == 1 {
					if let Some(node) = object.remove(NODE_JSON_KEY) {
						return entity_from_json(node).map(Self::Entity);
					}
				}
				Self::Map(object_from_json(object)?)
			}
		})
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::List(value)
	}
}

impl From<Entity> for Value {
	fn from(value: Entity) -> Self {
		Self::Entity(value)
	}
}

/// Collect labels into a sorted set.
pub fn label_set<I, S>(labels: I) -> BTreeSet<String>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	labels.into_iter().map(Into::into).collect()
}

/// Parse a JSON array of row objects.
pub fn rows_from_json(json: serde_json::Value) -> Result<Vec<Row>> {
	let serde_json::Value::Array(items) = json else {
		return Err(OgmError::InvalidValue {
			reason: "rows must be a JSON array".to_owned(),
		});
	};

	items
		.into_iter()
		.enumerate()
		.map(|(idx, item)| match item {
			serde_json::Value::Object(object) => object_from_json(object),
			_ => Err(OgmError::InvalidValue {
				reason: format!("row {idx} is not an object"),
			}),
		})
		.collect()
}

fn object_from_json(object: serde_json::Map<String, serde_json::Value>) -> Result<PropertyMap> {
	object.into_iter().map(|(key, value)| Ok((key, Value::from_json(value)?))).collect()
}

fn entity_from_json(node: serde_json::Value) -> Result<Entity> {
	let invalid = |reason: &str| OgmError::InvalidValue {
		reason: format!("{NODE_JSON_KEY}: {reason}"),
	};

	let serde_json::Value::Object(mut object) = node else {
		return Err(invalid("expected object"));
	};

	let id = match object.remove("id") {
		Some(serde_json::Value::Number(n)) => EntityId::Legacy(n.as_i64().ok_or_else(|| invalid("id out of range"))?),
		Some(serde_json::Value::String(s)) => EntityId::Element(s),
		Some(_) => return Err(invalid("id must be an integer or string")),
		None => return Err(invalid("missing id")),
	};

	let labels = match object.remove("labels") {
		Some(serde_json::Value::Array(items)) => items
			.into_iter()
			.map(|item| match item {
				serde_json::Value::String(label) => Ok(label),
				_ => Err(invalid("labels must be strings")),
			})
			.collect::<Result<BTreeSet<_>>>()?,
		None => BTreeSet::new(),
		Some(_) => return Err(invalid("labels must be an array")),
	};

	let properties = match object.remove("properties") {
		Some(serde_json::Value::Object(props)) => object_from_json(props)?,
		None => PropertyMap::new(),
		Some(_) => return Err(invalid("properties must be an object")),
	};

	Ok(Entity { id, labels, properties })
}
