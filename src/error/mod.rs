//! Error module orchestrator.
//!
//! Layout, render and configuration failures each get their own enum so call
//! sites can match narrowly; [`Error`] unifies them for the crate-level
//! [`Result`] alias.

mod types;

pub use types::{ConfigError, Error, LayoutError, LayoutWarning, RenderError, Result};
