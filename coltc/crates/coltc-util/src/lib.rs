//! coltc-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation every other compiler crate builds on:
//!
//! - [`SourceSpan`] - source location tracking for diagnostics
//! - [`Qword`] - the tagged 64-bit value container used for literal payloads
//!   and constant folding
//! - [`Handler`] / [`Diagnostic`] - diagnostic collection and rendering
//! - [`Symbol`] - interned strings for identifiers and keywords
//! - [`IndexVec`] / [`define_idx!`] - typed-index arenas
//!
//! All utilities are designed as zero-cost abstractions: typed indices
//! compile down to raw integers, symbols to a `u32`, and spans to plain
//! byte offsets into the source buffer.

pub mod diagnostic;
pub mod index_vec;
pub mod span;
pub mod symbol;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticConfig, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{ByteRange, SourceSpan};
pub use symbol::Symbol;
pub use value::Qword;

// Re-export commonly used types
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
