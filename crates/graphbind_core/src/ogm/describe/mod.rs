use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::ogm::{AbstractId, Destination, RecordId, Registry, ScalarKind, Shape, ShapeError};

/// Lowered destination shape the decoder walks.
///
/// Struct and interface nodes index into the [`Registry`] tables, so recursive
/// record types stay finite.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
	/// Dynamic value copied as-is.
	Any,
	/// Scalar leaf.
	Scalar(ScalarKind),
	/// Sequence of the element descriptor.
	Sequence(Arc<Descriptor>),
	/// String-keyed mapping of the value descriptor.
	Mapping(Arc<Descriptor>),
	/// Concrete record.
	Struct(RecordId),
	/// Abstract type resolved from entity labels.
	Interface(AbstractId),
}

impl Descriptor {
	/// Logical kind name used in diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Any => "any",
			Self::Scalar(kind) => kind.as_str(),
			Self::Sequence(_) => "list",
			Self::Mapping(_) => "map",
			Self::Struct(_) => "record",
			Self::Interface(_) => "entity",
		}
	}
}

/// Memoizing shape-to-descriptor translator over a shared registry.
///
/// Safe to share between threads; each distinct shape is lowered once.
#[derive(Debug)]
pub struct Describer {
	registry: Arc<Registry>,
	by_shape: DashMap<Shape, Arc<Descriptor>>,
	by_type: DashMap<TypeId, Arc<Descriptor>>,
}

impl Describer {
	/// Create a describer with empty caches.
	pub fn new(registry: Arc<Registry>) -> Self {
		Self {
			registry,
			by_shape: DashMap::new(),
			by_type: DashMap::new(),
		}
	}

	/// Registry the descriptors index into.
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Descriptor for `shape`, lowered on first use.
	pub fn describe(&self, shape: &Shape) -> Result<Arc<Descriptor>, ShapeError> {
		if let Some(hit) = self.by_shape.get(shape) {
			return Ok(Arc::clone(hit.value()));
		}

		let descriptor = Arc::new(self.registry.lower(shape)?);
		debug!("described shape {shape}");
		let entry = self.by_shape.entry(shape.clone()).or_insert(descriptor);
		Ok(Arc::clone(entry.value()))
	}

	/// Descriptor for a host destination type, keyed by type identity.
	pub fn describe_type<T: Destination>(&self) -> Result<Arc<Descriptor>, ShapeError> {
		let key = TypeId::of::<T>();
		if let Some(hit) = self.by_type.get(&key) {
			return Ok(Arc::clone(hit.value()));
		}

		let descriptor = self.describe(&T::shape())?;
		let entry = self.by_type.entry(key).or_insert(descriptor);
		Ok(Arc::clone(entry.value()))
	}

	/// Number of distinct shapes described so far.
	pub fn cached_shapes(&self) -> usize {
		self.by_shape.len()
	}
}
