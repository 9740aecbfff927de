//! The library code for the `docs-builder` static documentation builder. A
//! build is three passes over three source directories, run strictly in
//! order:
//!
//! 1. Rendering every markdown file to HTML ([`crate::markdown`])
//! 2. Collecting every partial verbatim ([`crate::partials`])
//! 3. Compiling every page template against both ([`crate::compile`])
//!
//! Each pass is a [`crate::walk::iterate_dir`] over one directory with a
//! different [`crate::walk::Visitor`]. The first two passes produce
//! [`crate::context::Mapping`]s which are then moved into the read-only
//! [`crate::context::Context`] that every template is rendered against.
//! [`crate::build::build_site`] runs the passes and stops at the first error.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod compile;
pub mod config;
pub mod context;
pub mod markdown;
pub mod partials;
mod value;
pub mod walk;
