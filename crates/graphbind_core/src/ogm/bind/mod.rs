use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::ogm::{
	DecodeError, DecodeErrorKind, DecodeOptions, Decoded, Decoder, Describer, Descriptor, Destination, FieldPath, FromDecoded, OgmError, PathStep, Result,
	Row, Shape, ShapeError, TransportError, Value,
};

/// Query text plus named parameters, as handed to the transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
	/// Query text, passed through untouched.
	pub text: String,
	/// Named parameters.
	pub params: BTreeMap<String, Value>,
}

impl Query {
	/// Query with no parameters.
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			params: BTreeMap::new(),
		}
	}

	/// Add one named parameter.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(name.into(), value.into());
		self
	}
}

/// Driver seam: runs a query and returns parsed rows.
pub trait Transport {
	/// Execute `query` and collect every row.
	fn run(&self, query: &Query) -> std::result::Result<Vec<Row>, TransportError>;
}

/// Shared cancellation flag checked before decoding starts.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
	/// Fresh, uncancelled flag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Request cancellation.
	pub fn cancel(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Whether cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

/// One column alias bound to a destination descriptor.
#[derive(Debug, Clone)]
pub struct Binding {
	/// Return column alias.
	pub alias: String,
	/// Destination shape.
	pub shape: Shape,
	/// Descriptor the column is decoded against.
	pub descriptor: Arc<Descriptor>,
}

/// Decoded columns of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRow {
	columns: BTreeMap<String, Decoded>,
	/// Elements skipped under [`crate::ogm::StopMode::Skip`], across all columns.
	pub skipped: Vec<DecodeError>,
}

impl BoundRow {
	/// Borrow a decoded column.
	pub fn decoded(&self, alias: &str) -> Option<&Decoded> {
		self.columns.get(alias)
	}

	/// Convert a decoded column into a host value.
	pub fn get<T: FromDecoded>(&self, alias: &str) -> std::result::Result<T, DecodeError> {
		let value = self.columns.get(alias).cloned().ok_or_else(|| missing_column(alias))?;
		T::from_decoded(value).map_err(|err| err.within(PathStep::Field(alias.to_owned())))
	}

	/// Move a decoded column out and convert it.
	pub fn take<T: FromDecoded>(&mut self, alias: &str) -> std::result::Result<T, DecodeError> {
		let value = self.columns.remove(alias).ok_or_else(|| missing_column(alias))?;
		T::from_decoded(value).map_err(|err| err.within(PathStep::Field(alias.to_owned())))
	}

	/// Bound aliases in sorted order.
	pub fn aliases(&self) -> impl Iterator<Item = &str> {
		self.columns.keys().map(String::as_str)
	}
}

/// Column bindings for one query invocation.
#[derive(Debug)]
pub struct ResultBinder<'d> {
	describer: &'d Describer,
	options: DecodeOptions,
	bindings: Vec<Binding>,
}

impl<'d> ResultBinder<'d> {
	/// Binder with no columns.
	pub fn new(describer: &'d Describer, options: DecodeOptions) -> Self {
		Self {
			describer,
			options,
			bindings: Vec::new(),
		}
	}

	/// Bind `alias` to a destination shape.
	pub fn bind(&mut self, alias: impl Into<String>, shape: &Shape) -> std::result::Result<&mut Self, ShapeError> {
		let descriptor = self.describer.describe(shape)?;
		self.bindings.push(Binding {
			alias: alias.into(),
			shape: shape.clone(),
			descriptor,
		});
		Ok(self)
	}

	/// Bind `alias` to a host destination type.
	pub fn bind_type<T: Destination>(&mut self, alias: impl Into<String>) -> std::result::Result<&mut Self, ShapeError> {
		let descriptor = self.describer.describe_type::<T>()?;
		self.bindings.push(Binding {
			alias: alias.into(),
			shape: T::shape(),
			descriptor,
		});
		Ok(self)
	}

	/// Declared bindings in order.
	pub fn bindings(&self) -> &[Binding] {
		&self.bindings
	}

	/// Decode every bound column of one row.
	pub fn decode_row(&self, row: &Row) -> std::result::Result<BoundRow, DecodeError> {
		let decoder = Decoder::new(self.describer, self.options.clone());
		self.decode_with(&decoder, row)
	}

	/// Decode a batch of rows; a cancelled flag stops before any work.
	pub fn decode_rows(&self, rows: &[Row], cancel: &CancelFlag) -> Result<Vec<BoundRow>> {
		if cancel.is_cancelled() {
			return Err(OgmError::Cancelled);
		}

		let decoder = Decoder::new(self.describer, self.options.clone());
		let out = rows.iter().map(|row| self.decode_with(&decoder, row)).collect::<std::result::Result<Vec<_>, _>>()?;
		debug!("decoded {} rows across {} bindings", out.len(), self.bindings.len());
		Ok(out)
	}

	fn decode_with(&self, decoder: &Decoder<'_>, row: &Row) -> std::result::Result<BoundRow, DecodeError> {
		let mut columns = BTreeMap::new();
		let mut skipped = Vec::new();
		for binding in &self.bindings {
			let value = row.get(&binding.alias).ok_or_else(|| missing_column(&binding.alias))?;
			let outcome = decoder.decode_at(FieldPath::field(binding.alias.clone()), value, &binding.descriptor)?;
			columns.insert(binding.alias.clone(), outcome.value);
			skipped.extend(outcome.skipped);
		}
		Ok(BoundRow { columns, skipped })
	}
}

/// Runs queries through a transport and decodes the rows.
#[derive(Debug)]
pub struct Executor<'t, T: Transport> {
	transport: &'t T,
}

impl<'t, T: Transport> Executor<'t, T> {
	/// Executor over `transport`.
	pub fn new(transport: &'t T) -> Self {
		Self { transport }
	}

	/// Run `query` and decode its rows with `binder`.
	pub fn run(&self, query: &Query, binder: &ResultBinder<'_>, cancel: &CancelFlag) -> Result<Vec<BoundRow>> {
		if cancel.is_cancelled() {
			return Err(OgmError::Cancelled);
		}
		let rows = self.transport.run(query)?;
		debug!("transport returned {} rows", rows.len());
		binder.decode_rows(&rows, cancel)
	}
}

fn missing_column(alias: &str) -> DecodeError {
	DecodeError::new(FieldPath::field(alias), DecodeErrorKind::MissingColumn { alias: alias.to_owned() })
}
