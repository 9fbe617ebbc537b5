use std::path::PathBuf;

use graphbind::ogm::{AbstractEntry, RecordEntry, Registry, ShapeError, TypeRef};

use crate::cmd::util::{emit_json, load_registry, render_descriptor};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Build the registry from a schema file and list its types.
pub fn run(args: Args) -> graphbind::ogm::Result<()> {
	let Args { schema, type_name, json } = args;
	let registry = load_registry(&schema)?;

	let (abstracts, records): (Vec<&AbstractEntry>, Vec<&RecordEntry>) = match &type_name {
		Some(name) => match registry.lookup(name) {
			Some(TypeRef::Abstract(id)) => (vec![registry.abstract_entry(id)], Vec::new()),
			Some(TypeRef::Record(id)) => (Vec::new(), vec![registry.record(id)]),
			None => return Err(ShapeError::UnknownType { name: name.clone() }.into()),
		},
		None => (registry.abstracts().iter().collect(), registry.records().iter().collect()),
	};

	if json {
		let payload = TypesJson {
			schema: schema.display().to_string(),
			abstracts: abstracts.iter().map(|item| abstract_json(&registry, item)).collect(),
			records: records.iter().map(|item| record_json(&registry, item)).collect(),
		};
		return emit_json(&payload);
	}

	println!("schema: {}", schema.display());
	println!("abstracts: {}", abstracts.len());
	println!("records: {}", records.len());

	if !abstracts.is_empty() {
		println!();
		println!("name\tlabel\timplementers");
		for item in &abstracts {
			println!("{}\t{}\t{}", item.name, item.label, implementer_names(&registry, item).join(", "));
		}
	}

	for item in &records {
		println!();
		let labels = item.labels.iter().cloned().collect::<Vec<_>>().join(",");
		println!("record {} [{}]", item.name, if labels.is_empty() { "-" } else { labels.as_str() });
		for field in &item.fields {
			let shape = render_descriptor(&registry, &field.descriptor);
			if field.property == field.name {
				println!("  {}: {}", field.name, shape);
			} else {
				println!("  {} <- {}: {}", field.name, field.property, shape);
			}
		}
		if let Some(name) = &item.id_field {
			println!("  {name}: <id>");
		}
		if let Some(name) = &item.labels_field {
			println!("  {name}: <labels>");
		}
	}

	Ok(())
}

fn implementer_names<'a>(registry: &'a Registry, item: &AbstractEntry) -> Vec<&'a str> {
	item.implementers.iter().map(|id| registry.record(*id).name.as_ref()).collect()
}

fn abstract_json(registry: &Registry, item: &AbstractEntry) -> AbstractJson {
	AbstractJson {
		name: item.name.clone(),
		label: item.label.clone(),
		declared: item.declared.clone(),
		implementers: implementer_names(registry, item).into_iter().map(str::to_owned).collect(),
	}
}

fn record_json(registry: &Registry, item: &RecordEntry) -> RecordJson {
	RecordJson {
		name: item.name.to_string(),
		label: item.own_label.clone(),
		labels: item.labels.iter().cloned().collect(),
		ancestors: item.ancestors.clone(),
		fields: item
			.fields
			.iter()
			.map(|field| FieldJson {
				name: field.name.clone(),
				property: field.property.clone(),
				shape: render_descriptor(registry, &field.descriptor),
			})
			.collect(),
		id_field: item.id_field.clone(),
		labels_field: item.labels_field.clone(),
	}
}

#[derive(serde::Serialize)]
struct TypesJson {
	schema: String,
	abstracts: Vec<AbstractJson>,
	records: Vec<RecordJson>,
}

#[derive(serde::Serialize)]
struct AbstractJson {
	name: String,
	label: String,
	declared: Vec<String>,
	implementers: Vec<String>,
}

#[derive(serde::Serialize)]
struct RecordJson {
	name: String,
	label: Option<String>,
	labels: Vec<String>,
	ancestors: Vec<String>,
	fields: Vec<FieldJson>,
	#[serde(skip_serializing_if = "Option::is_none")]
	id_field: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	labels_field: Option<String>,
}

#[derive(serde::Serialize)]
struct FieldJson {
	name: String,
	property: String,
	shape: String,
}

#[cfg(test)]
mod tests;
