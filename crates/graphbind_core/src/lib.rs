//! Result binding for graph-database queries: declared types, label-driven polymorphism, and descriptor-driven decoding.

/// Type registry, destination descriptors, decoding, and the query binding boundary.
pub mod ogm;
