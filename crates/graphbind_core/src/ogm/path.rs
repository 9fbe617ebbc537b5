use std::fmt;

/// One step from a decode root towards a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
	/// Struct field or column alias.
	Field(String),
	/// Sequence element by zero-based index.
	Index(usize),
	/// Mapping entry by key.
	Key(String),
}

/// Location of a node inside a decoded value tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
	/// Ordered sequence of path steps.
	pub steps: Vec<PathStep>,
}

impl FieldPath {
	/// Empty path addressing the decode root.
	pub fn root() -> Self {
		Self::default()
	}

	/// Path starting at a named column or field.
	pub fn field(name: impl Into<String>) -> Self {
		Self {
			steps: vec![PathStep::Field(name.into())],
		}
	}

	/// Whether the path addresses the root.
	pub fn is_root(&self) -> bool {
		self.steps.is_empty()
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.steps.is_empty() {
			return f.write_str("<root>");
		}
		for (idx, step) in self.steps.iter().enumerate() {
			match step {
				PathStep::Field(name) if idx == 0 => write!(f, "{name}")?,
				PathStep::Field(name) => write!(f, ".{name}")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
				PathStep::Key(key) => write!(f, "[\"{key}\"]")?,
			}
		}
		Ok(())
	}
}
