#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Entity model shared by the Tessera serializer and its tools.
//!
//! - [`ast`]: the arena of declarations, types, contexts, generics,
//!   conformances and lowered bodies that a module is made of
//! - [`Interner`]: string interning for every name in the arena
//! - [`ForeignBridge`]: attribution of importer-produced declarations
//!
//! An [`ast::AstContext`] is built in memory by a front end or loaded from
//! its JSON description with [`ast::AstContext::from_json`].

pub mod ast;
mod bridge;
mod colors;
mod interner;
mod invariants;
mod load;

pub use bridge::{ForeignBridge, NativeBridge, OverlayBridge};
pub use colors::Colors;
pub use interner::{Interner, Symbol};
pub use load::LoadError;

#[cfg(test)]
mod interner_tests;
