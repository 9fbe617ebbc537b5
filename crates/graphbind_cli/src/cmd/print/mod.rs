use std::fmt::Write as _;

use graphbind::ogm::{Decoded, EntityId};

/// Output truncation and formatting limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of fields printed for a single record.
	pub max_fields_per_record: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for lists and maps.
	pub max_list_items: usize,
	/// Maximum recursive print depth for nested containers.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields_per_record: 80,
			max_string_len: 200,
			max_list_items: 16,
			max_print_depth: 8,
		}
	}
}

/// Print one decoded value tree to stdout.
pub fn print_value(value: &Decoded, indent: usize, options: PrintOptions) {
	print!("{}", render_value(value, indent, options));
}

/// Render one decoded value tree as indented text.
pub fn render_value(value: &Decoded, indent: usize, options: PrintOptions) -> String {
	let mut out = String::new();
	write_value(&mut out, value, indent, 0, options);
	out
}

fn write_value(out: &mut String, value: &Decoded, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Decoded::Null => line(out, &pad, "null"),
		Decoded::Bool(v) => line(out, &pad, &v.to_string()),
		Decoded::Int(v) => line(out, &pad, &v.to_string()),
		Decoded::Float(v) => line(out, &pad, &format!("{v:?}")),
		Decoded::String(v) => line(out, &pad, &format!("\"{}\"", truncate(v, options.max_string_len))),
		Decoded::List(items) => {
			if depth >= options.max_print_depth {
				line(out, &pad, &format!("[... {} items]", items.len()));
				return;
			}
			line(out, &pad, "[");
			for item in items.iter().take(options.max_list_items) {
				write_value(out, item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_list_items {
				line(out, &pad, &format!("  ... {} more", items.len() - options.max_list_items));
			}
			line(out, &pad, "]");
		}
		Decoded::Map(items) => {
			if depth >= options.max_print_depth {
				line(out, &pad, &format!("{{... {} entries}}", items.len()));
				return;
			}
			line(out, &pad, "{");
			for (key, item) in items.iter().take(options.max_list_items) {
				write_entry(out, &pad, &format!("\"{key}\""), item, indent, depth, options);
			}
			if items.len() > options.max_list_items {
				line(out, &pad, &format!("  ... {} more", items.len() - options.max_list_items));
			}
			line(out, &pad, "}");
		}
		Decoded::Record(record) => {
			if depth >= options.max_print_depth {
				line(out, &pad, &format!("{} {{ ... }}", record.type_name));
				return;
			}
			line(out, &pad, &format!("{} {{", record.type_name));
			for field in record.fields.iter().take(options.max_fields_per_record) {
				write_entry(out, &pad, &field.name, &field.value, indent, depth, options);
			}
			if record.fields.len() > options.max_fields_per_record {
				line(out, &pad, &format!("  ... {} more fields", record.fields.len() - options.max_fields_per_record));
			}
			line(out, &pad, "}");
		}
		Decoded::Entity(entity) => {
			let labels = entity.labels.iter().map(String::as_str).collect::<Vec<_>>().join(":");
			line(out, &pad, &format!("({}:{labels}) {} properties", render_id(&entity.id), entity.properties.len()));
		}
	}
}

fn write_entry(out: &mut String, pad: &str, name: &str, value: &Decoded, indent: usize, depth: u32, options: PrintOptions) {
	let _ = write!(out, "{pad}  {name} = ");
	if matches!(value, Decoded::Record(_) | Decoded::List(_) | Decoded::Map(_)) {
		out.push('\n');
		write_value(out, value, indent + 4, depth + 1, options);
	} else {
		write_value(out, value, 0, depth + 1, options);
	}
}

fn line(out: &mut String, pad: &str, text: &str) {
	let _ = writeln!(out, "{pad}{text}");
}

fn render_id(id: &EntityId) -> String {
	match id {
		EntityId::Legacy(v) => v.to_string(),
		EntityId::Element(v) => format!("\"{v}\""),
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests;
