use std::path::PathBuf;

use graphbind::ogm::{ShapeError, TypeRef};

use crate::cmd::util::{emit_json, load_registry, parse_labels};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long)]
	pub labels: String,
	#[arg(long = "type")]
	pub type_name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Resolve a label set to a concrete type, optionally through one declared type.
pub fn run(args: Args) -> graphbind::ogm::Result<()> {
	let Args {
		schema,
		labels,
		type_name,
		json,
	} = args;

	let registry = load_registry(&schema)?;
	let labels = parse_labels(&labels);

	let (candidates, resolved) = match &type_name {
		Some(name) => match registry.lookup(name) {
			Some(TypeRef::Abstract(id)) => {
				let candidates = registry.abstract_entry(id).implementers.iter().map(|record| registry.record(*record).name.to_string()).collect();
				(candidates, registry.resolve(id, &labels))
			}
			Some(TypeRef::Record(id)) => {
				let record = registry.record(id);
				(vec![record.name.to_string()], Some(record).filter(|record| record.matches(&labels)))
			}
			None => return Err(ShapeError::UnknownType { name: name.clone() }.into()),
		},
		None => (registry.records().iter().map(|record| record.name.to_string()).collect(), registry.resolve_labels(&labels)),
	};

	if json {
		let payload = ResolveJson {
			labels: labels.iter().cloned().collect(),
			target: type_name,
			candidates,
			resolved: resolved.map(|record| record.name.to_string()),
			full_labels: resolved.map(|record| record.labels.iter().cloned().collect()),
		};
		return emit_json(&payload);
	}

	println!("labels: {}", labels.iter().cloned().collect::<Vec<_>>().join(","));
	if let Some(name) = &type_name {
		println!("target: {name}");
	}
	println!("candidates: {}", candidates.join(", "));
	match resolved {
		Some(record) => println!("resolved: {} [{}]", record.name, record.labels.iter().cloned().collect::<Vec<_>>().join(",")),
		None => println!("resolved: -"),
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct ResolveJson {
	labels: Vec<String>,
	target: Option<String>,
	candidates: Vec<String>,
	resolved: Option<String>,
	full_labels: Option<Vec<String>>,
}

#[cfg(test)]
mod tests;
