use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ogm::{OgmError, Result};

/// Scalar destination kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	/// Boolean.
	Bool,
	/// Signed integer.
	Int,
	/// Float; also accepts integers.
	Float,
	/// UTF-8 string.
	String,
}

impl ScalarKind {
	/// Keyword used in shape syntax.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::String => "string",
		}
	}
}

/// Static description of a destination's shape.
///
/// Text syntax: `any`, `bool`, `int`, `float`, `string`, `[X]` for a sequence,
/// `{X}` for a string-keyed mapping, an identifier for a registered type, and
/// `!name` for a type that cannot be written into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Shape {
	/// Dynamic value copied as-is.
	Any,
	/// Scalar leaf.
	Scalar(ScalarKind),
	/// Ordered sequence of an element shape.
	Sequence(Box<Shape>),
	/// String-keyed mapping of a value shape.
	Mapping(Box<Shape>),
	/// Registered record or abstract type.
	Named(String),
	/// Type that cannot be written into.
	Opaque(String),
}

impl Shape {
	/// Boolean scalar shape.
	pub fn bool() -> Self {
		Self::Scalar(ScalarKind::Bool)
	}

	/// Integer scalar shape.
	pub fn int() -> Self {
		Self::Scalar(ScalarKind::Int)
	}

	/// Float scalar shape.
	pub fn float() -> Self {
		Self::Scalar(ScalarKind::Float)
	}

	/// String scalar shape.
	pub fn string() -> Self {
		Self::Scalar(ScalarKind::String)
	}

	/// Sequence of `element`.
	pub fn sequence(element: Shape) -> Self {
		Self::Sequence(Box::new(element))
	}

	/// Mapping of `value`.
	pub fn mapping(value: Shape) -> Self {
		Self::Mapping(Box::new(value))
	}

	/// Reference to a registered type.
	pub fn named(name: impl Into<String>) -> Self {
		Self::Named(name.into())
	}

	/// Parse shape syntax.
	pub fn parse(input: &str) -> Result<Self> {
		let mut parser = Parser {
			input,
			bytes: input.as_bytes(),
			idx: 0,
		};
		let shape = parser.shape()?;
		parser.skip_ws();
		if parser.idx != parser.bytes.len() {
			return Err(parser.invalid());
		}
		Ok(shape)
	}
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Any => f.write_str("any"),
			Self::Scalar(kind) => f.write_str(kind.as_str()),
			Self::Sequence(inner) => write!(f, "[{inner}]"),
			Self::Mapping(inner) => write!(f, "{{{inner}}}"),
			Self::Named(name) => f.write_str(name),
			Self::Opaque(name) => write!(f, "!{name}"),
		}
	}
}

impl TryFrom<String> for Shape {
	type Error = OgmError;

	fn try_from(value: String) -> Result<Self> {
		Self::parse(&value)
	}
}

impl From<Shape> for String {
	fn from(value: Shape) -> Self {
		value.to_string()
	}
}

struct Parser<'a> {
	input: &'a str,
	bytes: &'a [u8],
	idx: usize,
}

impl Parser<'_> {
	fn invalid(&self) -> OgmError {
		OgmError::InvalidShape { text: self.input.to_owned() }
	}

	fn skip_ws(&mut self) {
		while self.idx < self.bytes.len() && self.bytes[self.idx].is_ascii_whitespace() {
			self.idx += 1;
		}
	}

	fn expect(&mut self, byte: u8) -> Result<()> {
		self.skip_ws();
		if self.bytes.get(self.idx) != Some(&byte) {
			return Err(self.invalid());
		}
		self.idx += 1;
		Ok(())
	}

	fn shape(&mut self) -> Result<Shape> {
		self.skip_ws();
		match self.bytes.get(self.idx) {
			Some(b'[') => {
				self.idx += 1;
				let inner = self.shape()?;
				self.expect(b']')?;
				Ok(Shape::sequence(inner))
			}
			Some(b'{') => {
				self.idx += 1;
				let inner = self.shape()?;
				self.expect(b'}')?;
				Ok(Shape::mapping(inner))
			}
			Some(b'!') => {
				self.idx += 1;
				Ok(Shape::Opaque(self.ident()?.to_owned()))
			}
			Some(_) => {
				let ident = self.ident()?;
				Ok(match ident {
					"any" => Shape::Any,
					"bool" => Shape::bool(),
					"int" => Shape::int(),
					"float" => Shape::float(),
					"string" => Shape::string(),
					name => Shape::named(name),
				})
			}
			None => Err(self.invalid()),
		}
	}

	fn ident(&mut self) -> Result<&str> {
		let start = self.idx;
		while self.idx < self.bytes.len() && (self.bytes[self.idx].is_ascii_alphanumeric() || self.bytes[self.idx] == b'_') {
			self.idx += 1;
		}
		if self.idx == start || self.bytes[start].is_ascii_digit() {
			return Err(self.invalid());
		}
		Ok(&self.input[start..self.idx])
	}
}

#[cfg(test)]
mod tests {
	use super::Shape;

	#[test]
	fn parses_nested_sequences_of_named_types() {
		let shape = Shape::parse("[[Human]]").expect("shape parses");
		assert_eq!(shape, Shape::sequence(Shape::sequence(Shape::named("Human"))));
	}

	#[test]
	fn parses_scalars_mappings_and_opaque() {
		assert_eq!(Shape::parse("{ [int] }").expect("shape parses"), Shape::mapping(Shape::sequence(Shape::int())));
		assert_eq!(Shape::parse("any").expect("shape parses"), Shape::Any);
		assert_eq!(Shape::parse("!callback").expect("shape parses"), Shape::Opaque("callback".into()));
	}

	#[test]
	fn display_round_trips_through_parse() {
		for text in ["[[Human]]", "{string}", "[{float}]", "!fn", "bool"] {
			let shape = Shape::parse(text).expect("shape parses");
			assert_eq!(shape.to_string(), text);
		}
	}

	#[test]
	fn rejects_malformed_shapes() {
		for bad in ["", "[int", "int]", "{int]", "[]", "1abc", "a b", "!"] {
			assert!(Shape::parse(bad).is_err(), "expected {bad:?} to be rejected");
		}
	}

	#[test]
	fn deserializes_from_json_string() {
		let shape: Shape = serde_json::from_str("\"[Person]\"").expect("shape deserializes");
		assert_eq!(shape, Shape::sequence(Shape::named("Person")));
		assert!(serde_json::from_str::<Shape>("\"[Person\"").is_err());
	}
}
