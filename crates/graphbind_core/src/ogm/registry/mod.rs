use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use log::{debug, trace};

use crate::ogm::{AbstractDecl, ConfigError, Descriptor, RecordDecl, Shape, ShapeError, TypeDecl, TypeSet};

/// Index of a concrete record in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u32);

impl RecordId {
	/// Table index.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Index of an abstract type in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbstractId(u32);

impl AbstractId {
	/// Table index.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Registered type reference by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
	/// Concrete record.
	Record(RecordId),
	/// Abstract type.
	Abstract(AbstractId),
}

/// One lowered record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
	/// Field name on the record.
	pub name: String,
	/// Property read from the source map.
	pub property: String,
	/// Field value descriptor.
	pub descriptor: Descriptor,
}

/// Registered concrete record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
	/// Own table index.
	pub id: RecordId,
	/// Type name.
	pub name: Arc<str>,
	/// Own label, if any.
	pub own_label: Option<String>,
	/// Own label plus every ancestor abstract label.
	pub labels: BTreeSet<String>,
	/// Ancestor abstract type names, in registration order.
	pub ancestors: Vec<String>,
	/// Property-backed fields in declaration order.
	pub fields: Vec<FieldSlot>,
	/// Identity sentinel field.
	pub id_field: Option<String>,
	/// Label-set sentinel field.
	pub labels_field: Option<String>,
}

impl RecordEntry {
	/// Whether this record's label set is contained in `labels`.
	pub fn matches(&self, labels: &BTreeSet<String>) -> bool {
		!self.labels.is_empty() && self.labels.is_subset(labels)
	}
}

/// Registered abstract type.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractEntry {
	/// Own table index.
	pub id: AbstractId,
	/// Type name.
	pub name: String,
	/// Abstract label.
	pub label: String,
	/// Implementer names as declared (records or abstract types).
	pub declared: Vec<String>,
	/// Concrete implementers, flattened depth-first in declaration order.
	pub implementers: Vec<RecordId>,
}

/// Immutable table of declared records and abstract types.
///
/// Built once from a [`TypeSet`]; safe to share across threads for reads.
#[derive(Debug)]
pub struct Registry {
	records: Vec<RecordEntry>,
	abstracts: Vec<AbstractEntry>,
	by_name: HashMap<String, TypeRef>,
}

impl Registry {
	/// Validate declarations and build the lookup tables.
	pub fn build(set: &TypeSet) -> Result<Self, ConfigError> {
		let mut by_name = HashMap::with_capacity(set.types.len());
		let mut record_decls: Vec<&RecordDecl> = Vec::new();
		let mut abstract_decls: Vec<&AbstractDecl> = Vec::new();

		for decl in &set.types {
			let type_ref = match decl {
				TypeDecl::Record(item) => {
					record_decls.push(item);
					TypeRef::Record(RecordId(record_decls.len() as u32 - 1))
				}
				TypeDecl::Abstract(item) => {
					abstract_decls.push(item);
					TypeRef::Abstract(AbstractId(abstract_decls.len() as u32 - 1))
				}
			};
			if by_name.insert(decl.name().to_owned(), type_ref).is_some() {
				return Err(ConfigError::DuplicateType { name: decl.name().to_owned() });
			}
		}

		for item in &abstract_decls {
			check_abstract(item, &by_name)?;
		}

		let abstract_edges: Vec<Vec<usize>> = abstract_decls
			.iter()
			.map(|item| {
				item.implementers
					.iter()
					.filter_map(|name| match by_name.get(name) {
						Some(TypeRef::Abstract(id)) => Some(id.index()),
						_ => None,
					})
					.collect()
			})
			.collect();
		let abstract_names: Vec<&str> = abstract_decls.iter().map(|item| item.name.as_str()).collect();
		if let Some(path) = find_cycle(&abstract_edges, &abstract_names) {
			return Err(ConfigError::Cycle { path });
		}

		let mut ancestors: Vec<Vec<usize>> = vec![Vec::new(); record_decls.len()];
		let mut abstracts = Vec::with_capacity(abstract_decls.len());
		for (idx, item) in abstract_decls.iter().enumerate() {
			let mut implementers = Vec::new();
			flatten_implementers(idx, &abstract_decls, &by_name, &mut implementers);
			for record in &implementers {
				ancestors[record.index()].push(idx);
			}
			abstracts.push(AbstractEntry {
				id: AbstractId(idx as u32),
				name: item.name.clone(),
				label: item.label.clone(),
				declared: item.implementers.clone(),
				implementers,
			});
		}

		let mut records = Vec::with_capacity(record_decls.len());
		for (idx, item) in record_decls.iter().enumerate() {
			let own_label = item.label.clone().filter(|label| !label.is_empty());
			if own_label.is_none() && !ancestors[idx].is_empty() {
				return Err(ConfigError::MissingLabel { name: item.name.clone() });
			}

			let mut labels: BTreeSet<String> = own_label.iter().cloned().collect();
			labels.extend(ancestors[idx].iter().map(|abs| abstract_decls[*abs].label.clone()));

			records.push(RecordEntry {
				id: RecordId(idx as u32),
				name: Arc::from(item.name.as_str()),
				own_label,
				labels,
				ancestors: ancestors[idx].iter().map(|abs| abstract_decls[*abs].name.clone()).collect(),
				fields: lower_fields(item, &by_name)?,
				id_field: item.id_field.clone(),
				labels_field: item.labels_field.clone(),
			});
		}

		check_label_collisions(&records)?;

		let value_edges: Vec<Vec<usize>> = records
			.iter()
			.map(|item| {
				item.fields
					.iter()
					.filter_map(|field| match field.descriptor {
						Descriptor::Struct(id) => Some(id.index()),
						_ => None,
					})
					.collect()
			})
			.collect();
		let record_names: Vec<&str> = record_decls.iter().map(|item| item.name.as_str()).collect();
		if let Some(path) = find_cycle(&value_edges, &record_names) {
			return Err(ConfigError::Cycle { path });
		}

		debug!("type registry built: {} records, {} abstract types", records.len(), abstracts.len());
		for item in &abstracts {
			debug!("abstract {} ({}) -> {:?}", item.name, item.label, item.implementers.iter().map(|id| records[id.index()].name.as_ref()).collect::<Vec<_>>());
		}

		Ok(Self { records, abstracts, by_name })
	}

	/// Look up a registered type by name.
	pub fn lookup(&self, name: &str) -> Option<TypeRef> {
		self.by_name.get(name).copied()
	}

	/// Record entry by id.
	pub fn record(&self, id: RecordId) -> &RecordEntry {
		&self.records[id.index()]
	}

	/// Abstract entry by id.
	pub fn abstract_entry(&self, id: AbstractId) -> &AbstractEntry {
		&self.abstracts[id.index()]
	}

	/// Record entry by type name.
	pub fn record_by_name(&self, name: &str) -> Option<&RecordEntry> {
		match self.lookup(name)? {
			TypeRef::Record(id) => Some(self.record(id)),
			TypeRef::Abstract(_) => None,
		}
	}

	/// Abstract entry by type name.
	pub fn abstract_by_name(&self, name: &str) -> Option<&AbstractEntry> {
		match self.lookup(name)? {
			TypeRef::Abstract(id) => Some(self.abstract_entry(id)),
			TypeRef::Record(_) => None,
		}
	}

	/// All records in registration order.
	pub fn records(&self) -> &[RecordEntry] {
		&self.records
	}

	/// All abstract types in registration order.
	pub fn abstracts(&self) -> &[AbstractEntry] {
		&self.abstracts
	}

	/// Own labels of an abstract type's implementers, in resolution order.
	pub fn implementer_labels(&self, id: AbstractId) -> Vec<&str> {
		self.abstract_entry(id)
			.implementers
			.iter()
			.filter_map(|record| self.record(*record).own_label.as_deref())
			.collect()
	}

	/// First implementer of `id` whose full label set is contained in `labels`.
	pub fn resolve(&self, id: AbstractId, labels: &BTreeSet<String>) -> Option<&RecordEntry> {
		let entry = self.abstract_entry(id);
		let hit = entry.implementers.iter().map(|record| self.record(*record)).find(|record| record.matches(labels));
		trace!("resolve {} {:?} -> {:?}", entry.name, labels, hit.map(|record| record.name.as_ref()));
		hit
	}

	/// [`Registry::resolve`] by abstract type name.
	pub fn resolve_named(&self, name: &str, labels: &BTreeSet<String>) -> Option<&RecordEntry> {
		let entry = self.abstract_by_name(name)?;
		self.resolve(entry.id, labels)
	}

	/// Most specific record whose label set is contained in `labels`.
	///
	/// Ties keep the earliest registered record.
	pub fn resolve_labels(&self, labels: &BTreeSet<String>) -> Option<&RecordEntry> {
		self.records.iter().filter(|record| record.matches(labels)).fold(None, |best: Option<&RecordEntry>, record| match best {
			Some(current) if current.labels.len() >= record.labels.len() => Some(current),
			_ => Some(record),
		})
	}

	/// Lower a destination shape against this registry.
	pub fn lower(&self, shape: &Shape) -> Result<Descriptor, ShapeError> {
		lower_shape(&self.by_name, shape)
	}
}

fn check_abstract(item: &AbstractDecl, by_name: &HashMap<String, TypeRef>) -> Result<(), ConfigError> {
	if item.label.is_empty() {
		return Err(ConfigError::MissingLabel { name: item.name.clone() });
	}
	if item.implementers.is_empty() {
		return Err(ConfigError::NoImplementers { name: item.name.clone() });
	}

	let mut seen = HashSet::with_capacity(item.implementers.len());
	for name in &item.implementers {
		if !by_name.contains_key(name) {
			return Err(ConfigError::UnknownType {
				owner: item.name.clone(),
				name: name.clone(),
			});
		}
		if !seen.insert(name.as_str()) {
			return Err(ConfigError::DuplicateImplementer {
				owner: item.name.clone(),
				name: name.clone(),
			});
		}
	}
	Ok(())
}

fn flatten_implementers(idx: usize, decls: &[&AbstractDecl], by_name: &HashMap<String, TypeRef>, out: &mut Vec<RecordId>) {
	for name in &decls[idx].implementers {
		match by_name.get(name) {
			Some(TypeRef::Record(id)) => {
				if !out.contains(id) {
					out.push(*id);
				}
			}
			Some(TypeRef::Abstract(id)) => flatten_implementers(id.index(), decls, by_name, out),
			None => {}
		}
	}
}

fn lower_fields(item: &RecordDecl, by_name: &HashMap<String, TypeRef>) -> Result<Vec<FieldSlot>, ConfigError> {
	let mut names = HashSet::new();
	let mut properties = HashSet::new();
	let duplicate = |name: &str| ConfigError::DuplicateField {
		record: item.name.clone(),
		name: name.to_owned(),
	};

	let mut fields = Vec::with_capacity(item.fields.len());
	for field in &item.fields {
		let property = field.property_name();
		if !names.insert(field.name.as_str()) {
			return Err(duplicate(&field.name));
		}
		if !properties.insert(property) {
			return Err(duplicate(property));
		}

		let descriptor = lower_shape(by_name, &field.shape).map_err(|err| match err {
			ShapeError::UnknownType { name } => ConfigError::UnknownFieldType {
				record: item.name.clone(),
				field: field.name.clone(),
				name,
			},
			ShapeError::Unaddressable { shape } => ConfigError::UnaddressableField {
				record: item.name.clone(),
				field: field.name.clone(),
				shape,
			},
		})?;

		fields.push(FieldSlot {
			name: field.name.clone(),
			property: property.to_owned(),
			descriptor,
		});
	}

	for sentinel in [&item.id_field, &item.labels_field].into_iter().flatten() {
		if !names.insert(sentinel.as_str()) {
			return Err(duplicate(sentinel));
		}
	}

	Ok(fields)
}

fn lower_shape(by_name: &HashMap<String, TypeRef>, shape: &Shape) -> Result<Descriptor, ShapeError> {
	Ok(match shape {
		Shape::Any => Descriptor::Any,
		Shape::Scalar(kind) => Descriptor::Scalar(*kind),
		Shape::Sequence(inner) => Descriptor::Sequence(Arc::new(lower_shape(by_name, inner)?)),
		Shape::Mapping(inner) => Descriptor::Mapping(Arc::new(lower_shape(by_name, inner)?)),
		Shape::Named(name) => match by_name.get(name) {
			Some(TypeRef::Record(id)) => Descriptor::Struct(*id),
			Some(TypeRef::Abstract(id)) => Descriptor::Interface(*id),
			None => return Err(ShapeError::UnknownType { name: name.clone() }),
		},
		Shape::Opaque(_) => return Err(ShapeError::Unaddressable { shape: shape.to_string() }),
	})
}

fn check_label_collisions(records: &[RecordEntry]) -> Result<(), ConfigError> {
	let mut seen: HashMap<&BTreeSet<String>, &RecordEntry> = HashMap::new();
	for record in records.iter().filter(|record| !record.labels.is_empty()) {
		if let Some(first) = seen.insert(&record.labels, record) {
			return Err(ConfigError::LabelCollision {
				first: first.name.to_string(),
				second: record.name.to_string(),
				labels: record.labels.iter().cloned().collect(),
			});
		}
	}
	Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
	New,
	Visiting,
	Done,
}

fn find_cycle(edges: &[Vec<usize>], names: &[&str]) -> Option<Vec<String>> {
	let mut marks = vec![Mark::New; edges.len()];
	let mut stack = Vec::new();
	(0..edges.len()).find_map(|start| visit(start, edges, names, &mut marks, &mut stack))
}

fn visit(node: usize, edges: &[Vec<usize>], names: &[&str], marks: &mut [Mark], stack: &mut Vec<usize>) -> Option<Vec<String>> {
	match marks[node] {
		Mark::Done => return None,
		Mark::Visiting => {
			let start = stack.iter().position(|item| *item == node).unwrap_or(0);
			let mut path: Vec<String> = stack[start..].iter().map(|item| names[*item].to_owned()).collect();
			path.push(names[node].to_owned());
			return Some(path);
		}
		Mark::New => {}
	}

	marks[node] = Mark::Visiting;
	stack.push(node);
	for next in &edges[node] {
		if let Some(path) = visit(*next, edges, names, marks, stack) {
			return Some(path);
		}
	}
	stack.pop();
	marks[node] = Mark::Done;
	None
}
