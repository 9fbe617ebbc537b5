use std::collections::BTreeSet;

use graphbind::ogm::{Descriptor, OgmError, Registry, Result, Shape, TypeSet};
use serde::Serialize;

/// Pretty-print a serializable payload to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Parse an `ALIAS=SHAPE` column binding.
pub(crate) fn parse_bind(spec: &str) -> Result<(String, Shape)> {
	let invalid = || OgmError::InvalidBinding { spec: spec.to_owned() };
	let (alias, shape) = spec.split_once('=').ok_or_else(invalid)?;
	let alias = alias.trim();
	if alias.is_empty() {
		return Err(invalid());
	}
	Ok((alias.to_owned(), Shape::parse(shape)?))
}

/// Load a schema file and build its registry.
pub(crate) fn load_registry(path: &std::path::Path) -> Result<Registry> {
	let set = TypeSet::load(path)?;
	Ok(Registry::build(&set)?)
}

/// Render a descriptor back into shape syntax using registry names.
pub(crate) fn render_descriptor(registry: &Registry, descriptor: &Descriptor) -> String {
	match descriptor {
		Descriptor::Any => "any".to_owned(),
		Descriptor::Scalar(kind) => kind.as_str().to_owned(),
		Descriptor::Sequence(inner) => format!("[{}]", render_descriptor(registry, inner)),
		Descriptor::Mapping(inner) => format!("{{{}}}", render_descriptor(registry, inner)),
		Descriptor::Struct(id) => registry.record(*id).name.to_string(),
		Descriptor::Interface(id) => registry.abstract_entry(*id).name.clone(),
	}
}

/// Parse a comma-separated label list, ignoring blanks.
pub(crate) fn parse_labels(raw: &str) -> BTreeSet<String> {
	raw.split(',').map(str::trim).filter(|label| !label.is_empty()).map(str::to_owned).collect()
}
