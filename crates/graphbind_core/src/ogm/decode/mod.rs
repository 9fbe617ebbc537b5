use std::collections::{BTreeMap, BTreeSet};

use log::warn;

use crate::ogm::{
	AbstractId, DecodeError, DecodeErrorKind, Decoded, Describer, Descriptor, EntityId, FieldPath, FieldValue, PathStep, PropertyMap, RecordEntry, RecordValue,
	Registry, ScalarKind, Value,
};

/// Default side-channel key carrying labels on projected property maps.
pub const DEFAULT_LABELS_KEY: &str = "__labels";
/// Default side-channel key carrying identity on projected property maps.
pub const DEFAULT_ID_KEY: &str = "__id";

/// Behavior when a polymorphic element cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
	/// Abort the whole decode with the path-annotated error.
	Error,
	/// Store `Null` for the element and report the error in [`DecodeOutcome::skipped`].
	Skip,
}

/// Runtime limits and behavior switches for result decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum nesting depth of the value tree.
	pub max_depth: u32,
	/// Policy for unresolved or unlabelled polymorphic values.
	pub on_unresolved: StopMode,
	/// Map key carrying labels for projected entities.
	pub labels_key: String,
	/// Map key carrying identity for projected entities.
	pub id_key: String,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			on_unresolved: StopMode::Error,
			labels_key: DEFAULT_LABELS_KEY.to_owned(),
			id_key: DEFAULT_ID_KEY.to_owned(),
		}
	}
}

impl DecodeOptions {
	/// Preset that skips unresolved polymorphic elements instead of aborting.
	pub fn skip_unresolved() -> Self {
		Self {
			on_unresolved: StopMode::Skip,
			..Self::default()
		}
	}
}

/// Decoded value plus the element errors skipped under [`StopMode::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
	/// Populated destination value.
	pub value: Decoded,
	/// Errors for elements replaced by `Null`, in visit order.
	pub skipped: Vec<DecodeError>,
}

/// Stateless walker decoding dynamic values against descriptors.
#[derive(Debug, Clone)]
pub struct Decoder<'r> {
	registry: &'r Registry,
	options: DecodeOptions,
}

impl<'r> Decoder<'r> {
	/// Create a decoder over the registry `describer` lowers into.
	///
	/// Descriptors passed to [`Decoder::decode`] must come from the same describer.
	pub fn new(describer: &'r Describer, options: DecodeOptions) -> Self {
		Self {
			registry: describer.registry(),
			options,
		}
	}

	/// Active options.
	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	/// Decode `value` against `descriptor` from an empty root path.
	pub fn decode(&self, value: &Value, descriptor: &Descriptor) -> Result<DecodeOutcome, DecodeError> {
		self.decode_at(FieldPath::root(), value, descriptor)
	}

	/// Decode with error paths prefixed by `root` (typically the column alias).
	pub fn decode_at(&self, root: FieldPath, value: &Value, descriptor: &Descriptor) -> Result<DecodeOutcome, DecodeError> {
		let mut walk = Walk {
			decoder: self,
			path: root.steps,
			skipped: Vec::new(),
		};
		let value = walk.value(value, descriptor, 0)?;
		Ok(DecodeOutcome {
			value,
			skipped: walk.skipped,
		})
	}

	/// Zero value of a descriptor: what `Null` decodes to.
	pub fn zero(&self, descriptor: &Descriptor) -> Decoded {
		match descriptor {
			Descriptor::Any | Descriptor::Interface(_) => Decoded::Null,
			Descriptor::Scalar(kind) => zero_scalar(*kind),
			Descriptor::Sequence(_) => Decoded::List(Vec::new()),
			Descriptor::Mapping(_) => Decoded::Map(BTreeMap::new()),
			Descriptor::Struct(id) => Decoded::Record(self.zero_record(self.registry.record(*id))),
		}
	}

	fn zero_record(&self, record: &RecordEntry) -> RecordValue {
		let mut fields: Vec<FieldValue> = record
			.fields
			.iter()
			.map(|field| FieldValue {
				name: field.name.as_str().into(),
				value: self.zero(&field.descriptor),
			})
			.collect();
		if let Some(name) = &record.id_field {
			fields.push(FieldValue {
				name: name.as_str().into(),
				value: Decoded::Null,
			});
		}
		if let Some(name) = &record.labels_field {
			fields.push(FieldValue {
				name: name.as_str().into(),
				value: Decoded::List(Vec::new()),
			});
		}
		RecordValue {
			type_name: record.name.clone(),
			fields,
		}
	}
}

fn zero_scalar(kind: ScalarKind) -> Decoded {
	match kind {
		ScalarKind::Bool => Decoded::Bool(false),
		ScalarKind::Int => Decoded::Int(0),
		ScalarKind::Float => Decoded::Float(0.0),
		ScalarKind::String => Decoded::String(String::new()),
	}
}

/// Property source for one record: properties plus optional sentinel values.
struct RecordSource<'v> {
	properties: &'v PropertyMap,
	id: Option<Decoded>,
	labels: Option<Vec<String>>,
	side_channel: bool,
}

struct Walk<'d, 'r> {
	decoder: &'d Decoder<'r>,
	path: Vec<PathStep>,
	skipped: Vec<DecodeError>,
}

impl Walk<'_, '_> {
	fn error(&self, kind: DecodeErrorKind) -> DecodeError {
		DecodeError::new(FieldPath { steps: self.path.clone() }, kind)
	}

	fn mismatch(&self, descriptor: &Descriptor, value: &Value) -> DecodeError {
		self.error(DecodeErrorKind::TypeMismatch {
			expected: descriptor.kind_name(),
			found: value.kind_name(),
		})
	}

	fn nested(&mut self, step: PathStep, value: &Value, descriptor: &Descriptor, depth: u32) -> Result<Decoded, DecodeError> {
		self.path.push(step);
		let out = self.value(value, descriptor, depth + 1);
		self.path.pop();
		out
	}

	fn value(&mut self, value: &Value, descriptor: &Descriptor, depth: u32) -> Result<Decoded, DecodeError> {
		let max_depth = self.decoder.options.max_depth;
		if depth > max_depth {
			return Err(self.error(DecodeErrorKind::DepthExceeded { max_depth }));
		}

		if matches!(value, Value::Null) {
			return Ok(self.decoder.zero(descriptor));
		}

		match descriptor {
			Descriptor::Any => Ok(Decoded::from(value.clone())),
			Descriptor::Scalar(kind) => self.scalar(*kind, value, descriptor),
			Descriptor::Sequence(element) => {
				let Value::List(items) = value else {
					return Err(self.mismatch(descriptor, value));
				};
				let mut out = Vec::with_capacity(items.len());
				for (idx, item) in items.iter().enumerate() {
					out.push(self.nested(PathStep::Index(idx), item, element, depth)?);
				}
				Ok(Decoded::List(out))
			}
			Descriptor::Mapping(element) => {
				let properties = match value {
					Value::Map(map) => map,
					Value::Entity(entity) => &entity.properties,
					_ => return Err(self.mismatch(descriptor, value)),
				};
				let mut out = BTreeMap::new();
				for (key, item) in properties {
					out.insert(key.clone(), self.nested(PathStep::Key(key.clone()), item, element, depth)?);
				}
				Ok(Decoded::Map(out))
			}
			Descriptor::Struct(id) => {
				let source = match value {
					Value::Entity(entity) => entity_source(&entity.properties, &entity.id, &entity.labels),
					Value::Map(map) => self.map_source(map)?,
					_ => return Err(self.mismatch(descriptor, value)),
				};
				let registry = self.decoder.registry;
				self.record(registry.record(*id), source, depth).map(Decoded::Record)
			}
			Descriptor::Interface(id) => self.interface(*id, value, descriptor, depth),
		}
	}

	fn scalar(&self, kind: ScalarKind, value: &Value, descriptor: &Descriptor) -> Result<Decoded, DecodeError> {
		match (kind, value) {
			(ScalarKind::Bool, Value::Bool(v)) => Ok(Decoded::Bool(*v)),
			(ScalarKind::Int, Value::Int(v)) => Ok(Decoded::Int(*v)),
			(ScalarKind::Float, Value::Float(v)) => Ok(Decoded::Float(*v)),
			(ScalarKind::Float, Value::Int(v)) => Ok(Decoded::Float(*v as f64)),
			(ScalarKind::String, Value::String(v)) => Ok(Decoded::String(v.clone())),
			_ => Err(self.mismatch(descriptor, value)),
		}
	}

	fn interface(&mut self, id: AbstractId, value: &Value, descriptor: &Descriptor, depth: u32) -> Result<Decoded, DecodeError> {
		let registry = self.decoder.registry;
		let entry = registry.abstract_entry(id);

		let (labels, source) = match value {
			Value::Entity(entity) => (entity.labels.clone(), entity_source(&entity.properties, &entity.id, &entity.labels)),
			Value::Map(map) => {
				let source = self.map_source(map)?;
				let Some(labels) = source.labels.as_ref().map(|items| items.iter().cloned().collect::<BTreeSet<_>>()) else {
					let err = self.error(DecodeErrorKind::MissingLabels {
						abstract_name: entry.name.clone(),
						key: self.decoder.options.labels_key.clone(),
					});
					return self.unresolved(err);
				};
				(labels, source)
			}
			_ => return Err(self.mismatch(descriptor, value)),
		};

		match registry.resolve(id, &labels) {
			Some(record) => self.record(record, source, depth).map(Decoded::Record),
			None => {
				let err = self.error(DecodeErrorKind::UnresolvedPolymorphicType {
					abstract_name: entry.name.clone(),
					labels: labels.into_iter().collect(),
				});
				self.unresolved(err)
			}
		}
	}

	fn unresolved(&mut self, err: DecodeError) -> Result<Decoded, DecodeError> {
		match self.decoder.options.on_unresolved {
			StopMode::Error => Err(err),
			StopMode::Skip => {
				warn!("skipping element: {err}");
				self.skipped.push(err);
				Ok(Decoded::Null)
			}
		}
	}

	fn side_labels(&self, raw: &Value) -> Result<Vec<String>, DecodeError> {
		let mismatch = |found: &'static str| {
			self.error(DecodeErrorKind::TypeMismatch {
				expected: "list of labels",
				found,
			})
		};
		let Value::List(items) = raw else {
			return Err(mismatch(raw.kind_name()));
		};
		items
			.iter()
			.map(|item| match item {
				Value::String(label) => Ok(label.clone()),
				other => Err(mismatch(other.kind_name())),
			})
			.collect()
	}

	fn map_source<'v>(&self, map: &'v PropertyMap) -> Result<RecordSource<'v>, DecodeError> {
		let options = &self.decoder.options;
		let labels = map.get(&options.labels_key).map(|raw| self.side_labels(raw)).transpose()?;
		let id = match map.get(&options.id_key) {
			Some(Value::Int(v)) => Some(Decoded::Int(*v)),
			Some(Value::String(v)) => Some(Decoded::String(v.clone())),
			Some(Value::Null) | None => None,
			Some(other) => {
				return Err(self.error(DecodeErrorKind::TypeMismatch {
					expected: "entity id",
					found: other.kind_name(),
				}));
			}
		};

		Ok(RecordSource {
			properties: map,
			id,
			labels,
			side_channel: true,
		})
	}

	fn record(&mut self, record: &RecordEntry, source: RecordSource<'_>, depth: u32) -> Result<RecordValue, DecodeError> {
		let decoder = self.decoder;
		let options = &decoder.options;
		let mut fields = Vec::with_capacity(record.fields.len() + 2);
		for field in &record.fields {
			let skipped = source.side_channel && (field.property == options.labels_key || field.property == options.id_key);
			let value = match source.properties.get(&field.property) {
				Some(item) if !skipped => self.nested(PathStep::Field(field.name.clone()), item, &field.descriptor, depth)?,
				_ => self.decoder.zero(&field.descriptor),
			};
			fields.push(FieldValue {
				name: field.name.as_str().into(),
				value,
			});
		}

		if let Some(name) = &record.id_field {
			fields.push(FieldValue {
				name: name.as_str().into(),
				value: source.id.unwrap_or(Decoded::Null),
			});
		}
		if let Some(name) = &record.labels_field {
			let labels = source.labels.unwrap_or_default();
			fields.push(FieldValue {
				name: name.as_str().into(),
				value: Decoded::List(labels.into_iter().map(Decoded::String).collect()),
			});
		}

		Ok(RecordValue {
			type_name: record.name.clone(),
			fields,
		})
	}
}

fn entity_source<'v>(properties: &'v PropertyMap, id: &EntityId, labels: &BTreeSet<String>) -> RecordSource<'v> {
	RecordSource {
		properties,
		id: Some(Decoded::from(id)),
		labels: Some(labels.iter().cloned().collect()),
		side_channel: false,
	}
}
