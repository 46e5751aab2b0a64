//! Purpose: Library crate root for `junco` (libjunco).
//! Exports: `core` (document model, parser, serializer, errors) and `abi` (C surface).
//! Role: Backs the `cdylib`/`staticlib` consumed by host-language bindings.
//! Invariants: The Rust API in `core` holds all semantics; `abi` only translates
//! handles and ownership, never re-implements behavior.
//! Invariants: No global mutable state; every boundary allocation has one owner
//! and one release path.
pub mod abi;
pub mod core;

pub use crate::core::error::{ParseError, ParseErrorKind};
pub use crate::core::parse::ParseOptions;
pub use crate::core::value::{Document, Kind, ValueRef};
