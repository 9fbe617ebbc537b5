use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ogm::{Result, Shape};

/// Root set of type declarations a registry is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSet {
	/// Declarations in registration order.
	pub types: Vec<TypeDecl>,
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDecl {
	/// Concrete record type.
	Record(RecordDecl),
	/// Abstract type resolved to one of its implementers.
	Abstract(AbstractDecl),
}

impl TypeDecl {
	/// Declared type name.
	pub fn name(&self) -> &str {
		match self {
			Self::Record(item) => &item.name,
			Self::Abstract(item) => &item.name,
		}
	}
}

/// Concrete record declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDecl {
	/// Type name.
	pub name: String,
	/// Own label; absent for plain value records.
	#[serde(default)]
	pub label: Option<String>,
	/// Property-backed fields in declaration order.
	#[serde(default)]
	pub fields: Vec<FieldDecl>,
	/// Field receiving the entity identity.
	#[serde(default)]
	pub id_field: Option<String>,
	/// Field receiving the entity label set.
	#[serde(default)]
	pub labels_field: Option<String>,
}

/// One property-backed record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
	/// Field name on the record.
	pub name: String,
	/// Property name; defaults to the field name.
	#[serde(default)]
	pub property: Option<String>,
	/// Field shape.
	pub shape: Shape,
}

impl FieldDecl {
	/// Property name this field reads from.
	pub fn property_name(&self) -> &str {
		self.property.as_deref().unwrap_or(&self.name)
	}
}

/// Abstract type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractDecl {
	/// Type name.
	pub name: String,
	/// Label shared by every implementer.
	pub label: String,
	/// Implementer type names; order breaks resolution ties.
	#[serde(default)]
	pub implementers: Vec<String>,
}

impl TypeSet {
	/// Empty declaration set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a declaration.
	pub fn with(mut self, decl: impl Into<TypeDecl>) -> Self {
		self.types.push(decl.into());
		self
	}

	/// Parse a JSON schema document.
	pub fn from_json_str(input: &str) -> Result<Self> {
		Ok(serde_json::from_str(input)?)
	}

	/// Read and parse a JSON schema file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::from_json_str(&text)
	}
}

impl RecordDecl {
	/// Record with no label and no fields.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			fields: Vec::new(),
			id_field: None,
			labels_field: None,
		}
	}

	/// Set the own label.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Add a field reading the property of the same name.
	pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
		self.fields.push(FieldDecl {
			name: name.into(),
			property: None,
			shape,
		});
		self
	}

	/// Add a field reading a differently named property.
	pub fn field_as(mut self, name: impl Into<String>, property: impl Into<String>, shape: Shape) -> Self {
		self.fields.push(FieldDecl {
			name: name.into(),
			property: Some(property.into()),
			shape,
		});
		self
	}

	/// Name the identity sentinel field.
	pub fn id_field(mut self, name: impl Into<String>) -> Self {
		self.id_field = Some(name.into());
		self
	}

	/// Name the label-set sentinel field.
	pub fn labels_field(mut self, name: impl Into<String>) -> Self {
		self.labels_field = Some(name.into());
		self
	}
}

impl AbstractDecl {
	/// Abstract type with no implementers yet.
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			implementers: Vec::new(),
		}
	}

	/// Append an implementer by type name.
	pub fn implementer(mut self, name: impl Into<String>) -> Self {
		self.implementers.push(name.into());
		self
	}
}

impl From<RecordDecl> for TypeDecl {
	fn from(value: RecordDecl) -> Self {
		Self::Record(value)
	}
}

impl From<AbstractDecl> for TypeDecl {
	fn from(value: AbstractDecl) -> Self {
		Self::Abstract(value)
	}
}
