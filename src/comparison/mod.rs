//! Comparison testing support for scte224
//!
//! This module provides a namespace-resolved view of an XML document and a
//! structural diff over two such views. Round-trip checks use it to decide
//! whether re-serialized output carries the same content as its input,
//! independent of prefixes, namespace declaration placement, attribute order
//! and indentation.

pub mod xml_model;

pub use xml_model::*;
