use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use graphbind::ogm::{BoundRow, CancelFlag, DecodeOptions, Describer, ResultBinder, StopMode, rows_from_json};
use log::info;

use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{emit_json, load_registry, parse_bind};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	pub rows: PathBuf,
	#[arg(long = "bind", required = true)]
	pub bindings: Vec<String>,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "skip-unresolved")]
	pub skip_unresolved: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
}

/// Decode JSON-encoded rows against `ALIAS=SHAPE` bindings and print them.
pub fn run(args: Args) -> graphbind::ogm::Result<()> {
	let Args {
		schema,
		rows: rows_path,
		bindings,
		json,
		skip_unresolved,
		max_depth,
	} = args;

	let registry = Arc::new(load_registry(&schema)?);
	let describer = Describer::new(registry);

	let mut options = DecodeOptions::default();
	if skip_unresolved {
		options.on_unresolved = StopMode::Skip;
	}
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}

	let mut binder = ResultBinder::new(&describer, options);
	for spec in &bindings {
		let (alias, shape) = parse_bind(spec)?;
		binder.bind(alias, &shape)?;
	}

	let text = std::fs::read_to_string(&rows_path)?;
	let rows = rows_from_json(serde_json::from_str(&text)?)?;
	let bound = binder.decode_rows(&rows, &CancelFlag::new())?;
	info!("decoded {} rows from {}", bound.len(), rows_path.display());

	if json {
		let payload = DecodeJson {
			rows: bound.iter().map(|row| row_json(&binder, row)).collect(),
		};
		return emit_json(&payload);
	}

	println!("schema: {}", schema.display());
	println!("rows: {}", bound.len());
	for (idx, row) in bound.iter().enumerate() {
		println!();
		println!("row {idx}:");
		for binding in binder.bindings() {
			println!("  {} ({}):", binding.alias, binding.shape);
			if let Some(value) = row.decoded(&binding.alias) {
				print_value(value, 4, PrintOptions::default());
			}
		}
		for err in &row.skipped {
			println!("  skipped: {err}");
		}
	}

	Ok(())
}

fn row_json(binder: &ResultBinder<'_>, row: &BoundRow) -> RowJson {
	RowJson {
		columns: binder
			.bindings()
			.iter()
			.filter_map(|binding| row.decoded(&binding.alias).map(|value| (binding.alias.clone(), value.to_json())))
			.collect(),
		skipped: row
			.skipped
			.iter()
			.map(|err| SkippedJson {
				path: err.path.to_string(),
				error: err.kind.to_string(),
			})
			.collect(),
	}
}

#[derive(serde::Serialize)]
struct DecodeJson {
	rows: Vec<RowJson>,
}

#[derive(serde::Serialize)]
struct RowJson {
	columns: BTreeMap<String, serde_json::Value>,
	skipped: Vec<SkippedJson>,
}

#[derive(serde::Serialize)]
struct SkippedJson {
	path: String,
	error: String,
}

#[cfg(test)]
mod tests;
