use std::collections::{BTreeMap, HashMap};

use crate::ogm::{DecodeError, DecodeOptions, Decoded, Decoder, Describer, Entity, OgmError, PathStep, Shape, Value};

/// Conversion from a decoded node into a host value.
pub trait FromDecoded: Sized {
	/// Convert `value`, reporting mismatches with a path relative to `value`.
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError>;
}

/// Host type with a statically known destination shape.
pub trait Destination: FromDecoded + 'static {
	/// Shape the decoder walks for this type.
	fn shape() -> Shape;
}

/// Decode one dynamic value straight into a host destination type.
pub fn decode_into<T: Destination>(describer: &Describer, options: DecodeOptions, value: &Value) -> Result<T, OgmError> {
	let descriptor = describer.describe_type::<T>()?;
	let outcome = Decoder::new(describer, options).decode(value, &descriptor)?;
	Ok(T::from_decoded(outcome.value)?)
}

impl FromDecoded for Decoded {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		Ok(value)
	}
}

impl Destination for Decoded {
	fn shape() -> Shape {
		Shape::Any
	}
}

impl FromDecoded for bool {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		match value {
			Decoded::Bool(v) => Ok(v),
			other => Err(DecodeError::mismatch("bool", other.kind_name())),
		}
	}
}

impl Destination for bool {
	fn shape() -> Shape {
		Shape::bool()
	}
}

impl FromDecoded for i64 {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		match value {
			Decoded::Int(v) => Ok(v),
			other => Err(DecodeError::mismatch("int", other.kind_name())),
		}
	}
}

impl Destination for i64 {
	fn shape() -> Shape {
		Shape::int()
	}
}

macro_rules! narrow_int {
	($($ty:ty),*) => {
		$(
			impl FromDecoded for $ty {
				fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
					let wide = i64::from_decoded(value)?;
					<$ty>::try_from(wide).map_err(|_| DecodeError::mismatch(stringify!($ty), "int out of range"))
				}
			}

			impl Destination for $ty {
				fn shape() -> Shape {
					Shape::int()
				}
			}
		)*
	};
}

narrow_int!(i32, u32, u64, usize);

impl FromDecoded for f64 {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		match value {
			Decoded::Float(v) => Ok(v),
			Decoded::Int(v) => Ok(v as f64),
			other => Err(DecodeError::mismatch("float", other.kind_name())),
		}
	}
}

impl Destination for f64 {
	fn shape() -> Shape {
		Shape::float()
	}
}

impl FromDecoded for String {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		match value {
			Decoded::String(v) => Ok(v),
			other => Err(DecodeError::mismatch("string", other.kind_name())),
		}
	}
}

impl Destination for String {
	fn shape() -> Shape {
		Shape::string()
	}
}

impl FromDecoded for Entity {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		match value {
			Decoded::Entity(v) => Ok(v),
			other => Err(DecodeError::mismatch("entity", other.kind_name())),
		}
	}
}

impl Destination for Entity {
	fn shape() -> Shape {
		Shape::Any
	}
}

/// `None` only for `Null`, which scalar, list, map, and record destinations never produce.
impl<T: FromDecoded> FromDecoded for Option<T> {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		match value {
			Decoded::Null => Ok(None),
			other => T::from_decoded(other).map(Some),
		}
	}
}

impl<T: Destination> Destination for Option<T> {
	fn shape() -> Shape {
		T::shape()
	}
}

impl<T: FromDecoded> FromDecoded for Vec<T> {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		let items = match value {
			Decoded::List(items) => items,
			other => return Err(DecodeError::mismatch("list", other.kind_name())),
		};
		items
			.into_iter()
			.enumerate()
			.map(|(idx, item)| T::from_decoded(item).map_err(|err| err.within(PathStep::Index(idx))))
			.collect()
	}
}

impl<T: Destination> Destination for Vec<T> {
	fn shape() -> Shape {
		Shape::sequence(T::shape())
	}
}

fn map_entries<T: FromDecoded, C: FromIterator<(String, T)>>(value: Decoded) -> Result<C, DecodeError> {
	let items = match value {
		Decoded::Map(items) => items,
		other => return Err(DecodeError::mismatch("map", other.kind_name())),
	};
	items
		.into_iter()
		.map(|(key, item)| match T::from_decoded(item) {
			Ok(item) => Ok((key, item)),
			Err(err) => Err(err.within(PathStep::Key(key))),
		})
		.collect()
}

impl<T: FromDecoded> FromDecoded for BTreeMap<String, T> {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		map_entries(value)
	}
}

impl<T: Destination> Destination for BTreeMap<String, T> {
	fn shape() -> Shape {
		Shape::mapping(T::shape())
	}
}

impl<T: FromDecoded> FromDecoded for HashMap<String, T> {
	fn from_decoded(value: Decoded) -> Result<Self, DecodeError> {
		map_entries(value)
	}
}

impl<T: Destination> Destination for HashMap<String, T> {
	fn shape() -> Shape {
		Shape::mapping(T::shape())
	}
}

#[cfg(test)]
mod tests;
