use thiserror::Error;

use crate::ogm::FieldPath;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, OgmError>;

/// Errors produced while building a type registry from declarations.
///
/// These are fatal at startup: a registry is never returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// Two declarations share a type name.
	#[error("type {name} is declared more than once")]
	DuplicateType {
		/// Repeated type name.
		name: String,
	},
	/// An implementer or abstract type carries no label.
	#[error("type {name} has no label")]
	MissingLabel {
		/// Type lacking a label.
		name: String,
	},
	/// Abstract type declared with an empty implementer list.
	#[error("abstract type {name} declares no implementers")]
	NoImplementers {
		/// Abstract type name.
		name: String,
	},
	/// Implementer list references an undeclared type.
	#[error("abstract type {owner} lists unknown implementer {name}")]
	UnknownType {
		/// Abstract type holding the reference.
		owner: String,
		/// Unresolved implementer name.
		name: String,
	},
	/// Implementer listed more than once under the same abstract type.
	#[error("abstract type {owner} lists implementer {name} twice")]
	DuplicateImplementer {
		/// Abstract type holding the list.
		owner: String,
		/// Repeated implementer name.
		name: String,
	},
	/// Two concrete types resolve to the same full label set.
	#[error("types {first} and {second} share label set {labels:?}")]
	LabelCollision {
		/// First registered type.
		first: String,
		/// Second registered type.
		second: String,
		/// Shared label set, sorted.
		labels: Vec<String>,
	},
	/// Cyclic embedding between abstract types, or a record containing itself by value.
	#[error("cyclic embedding: {}", path.join(" -> "))]
	Cycle {
		/// Type names along the cycle, first and last equal.
		path: Vec<String>,
	},
	/// Field shape names a type that is not declared.
	#[error("field {record}.{field} names unknown type {name}")]
	UnknownFieldType {
		/// Record declaring the field.
		record: String,
		/// Field name.
		field: String,
		/// Unknown type name.
		name: String,
	},
	/// Field shape cannot be written into.
	#[error("field {record}.{field} has unaddressable shape {shape}")]
	UnaddressableField {
		/// Record declaring the field.
		record: String,
		/// Field name.
		field: String,
		/// Rendered shape.
		shape: String,
	},
	/// Two fields of one record share a property or field name.
	#[error("record {record} binds {name} twice")]
	DuplicateField {
		/// Record declaring the fields.
		record: String,
		/// Repeated property or field name.
		name: String,
	},
}

/// Errors produced while turning a destination shape into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
	/// Named destination has no registry entry.
	#[error("no registered type named {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Destination cannot be written into.
	#[error("unaddressable destination shape {shape}")]
	Unaddressable {
		/// Rendered shape.
		shape: String,
	},
}

/// Reason a single value failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
	/// Value kind is incompatible with the destination kind.
	#[error("type mismatch: expected {expected}, got {found}")]
	TypeMismatch {
		/// Destination kind.
		expected: &'static str,
		/// Source value kind.
		found: &'static str,
	},
	/// No implementer of an abstract type matches the entity labels.
	#[error("no implementer of {abstract_name} matches labels {labels:?}")]
	UnresolvedPolymorphicType {
		/// Abstract destination type.
		abstract_name: String,
		/// Labels present on the value, sorted.
		labels: Vec<String>,
	},
	/// Property map bound to an abstract type carries no label side channel.
	#[error("map bound to {abstract_name} has no {key} entry")]
	MissingLabels {
		/// Abstract destination type.
		abstract_name: String,
		/// Expected side-channel key.
		key: String,
	},
	/// Bound column alias is absent from the row.
	#[error("row has no column {alias}")]
	MissingColumn {
		/// Missing alias.
		alias: String,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
}

/// Path-annotated decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decode error at {path}: {kind}")]
pub struct DecodeError {
	/// Location of the failing node, from the decode root.
	pub path: FieldPath,
	/// Failure reason.
	pub kind: DecodeErrorKind,
}

impl DecodeError {
	/// Build an error at `path`.
	pub fn new(path: FieldPath, kind: DecodeErrorKind) -> Self {
		Self { path, kind }
	}

	/// Build a type mismatch at the root.
	pub fn mismatch(expected: &'static str, found: &'static str) -> Self {
		Self::new(FieldPath::root(), DecodeErrorKind::TypeMismatch { expected, found })
	}

	/// Prefix the error path with an enclosing step.
	pub fn within(mut self, step: crate::ogm::PathStep) -> Self {
		self.path.steps.insert(0, step);
		self
	}
}

/// Failure reported by the external query transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport: {message}")]
pub struct TransportError {
	/// Driver-provided description.
	pub message: String,
}

impl TransportError {
	/// Wrap a driver message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Umbrella error for registry, shape, decode, and IO failures.
#[derive(Debug, Error)]
pub enum OgmError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Malformed JSON input.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Registry construction failure.
	#[error("config: {0}")]
	Config(#[from] ConfigError),
	/// Destination shape failure.
	#[error("shape: {0}")]
	Shape(#[from] ShapeError),
	/// Value decode failure.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Transport failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Cancellation was requested before decoding started.
	#[error("cancelled before decoding")]
	Cancelled,
	/// Shape expression syntax is invalid.
	#[error("invalid shape: {text}")]
	InvalidShape {
		/// Original shape text.
		text: String,
	},
	/// JSON could not be read as a dynamic value.
	#[error("invalid value: {reason}")]
	InvalidValue {
		/// Description of the offending input.
		reason: String,
	},
	/// Column binding argument is malformed.
	#[error("invalid binding {spec} (expected ALIAS=SHAPE)")]
	InvalidBinding {
		/// User-provided binding text.
		spec: String,
	},
}
