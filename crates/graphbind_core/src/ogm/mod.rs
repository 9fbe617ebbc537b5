mod bind;
mod decl;
mod decode;
mod decoded;
mod describe;
mod error;
mod path;
mod registry;
mod shape;
mod typed;
mod value;

/// Query boundary: transport seam, column bindings, and cancellation.
pub use bind::{Binding, BoundRow, CancelFlag, Executor, Query, ResultBinder, Transport};
/// Declarative type sets loaded from JSON or built in code.
pub use decl::{AbstractDecl, FieldDecl, RecordDecl, TypeDecl, TypeSet};
/// Descriptor-driven decoding entry points and options.
pub use decode::{DEFAULT_ID_KEY, DEFAULT_LABELS_KEY, DecodeOptions, DecodeOutcome, Decoder, StopMode};
/// Decoded destination values.
pub use decoded::{Decoded, FieldValue, RecordValue};
/// Memoizing shape lowering.
pub use describe::{Describer, Descriptor};
/// Error and result aliases.
pub use error::{ConfigError, DecodeError, DecodeErrorKind, OgmError, Result, ShapeError, TransportError};
/// Field path parser types.
pub use path::{FieldPath, PathStep};
/// Built type registry and label resolution.
pub use registry::{AbstractEntry, AbstractId, FieldSlot, RecordEntry, RecordId, Registry, TypeRef};
/// Destination shape syntax.
pub use shape::{ScalarKind, Shape};
/// Host-type conversion traits.
pub use typed::{Destination, FromDecoded, decode_into};
/// Dynamic values returned by the transport.
pub use value::{Entity, EntityId, NODE_JSON_KEY, PropertyMap, Row, Value, label_set, rows_from_json};
