//! Domain model of the ProTief site content.
//!
//! The [`ContentDocument`] is the single aggregate every other crate reads
//! and writes. [`wire`] holds the shape exchanged with the content endpoint
//! and the two mapping functions between the shapes.

pub mod domain;
pub mod wire;

pub use domain::*;
pub use wire::{from_wire, to_wire, WireContent, WireError};
