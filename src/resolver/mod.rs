//! Prompt resolvers: turn free-form input into a [`LayoutRequest`].
//!
//! Resolving never places rooms. The builder does that, so every resolver
//! gets the same validation and packing.

use crate::error::{Error, Result};
use crate::layout::{LayoutBuilder, LayoutOutcome, LayoutRequest};
use crate::template::reference_request;

pub trait LayoutResolver {
    fn resolve(&self, prompt: &str) -> Result<LayoutRequest>;

    /// Resolve `prompt` and hand the request to `builder`.
    fn build(&self, prompt: &str, builder: &LayoutBuilder) -> Result<LayoutOutcome> {
        let request = self.resolve(prompt)?;
        Ok(builder.build(&request)?)
    }
}

/// Ignores the prompt and returns the seven-room reference house.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResolver;

impl LayoutResolver for TemplateResolver {
    fn resolve(&self, _prompt: &str) -> Result<LayoutRequest> {
        Ok(reference_request())
    }
}

/// Reads the prompt as a JSON-encoded request.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResolver;

impl LayoutResolver for JsonResolver {
    fn resolve(&self, prompt: &str) -> Result<LayoutRequest> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(Error::Resolve("prompt is empty".to_string()));
        }
        Ok(LayoutRequest::from_json_str(trimmed)?)
    }
}

impl<R: LayoutResolver + ?Sized> LayoutResolver for &R {
    fn resolve(&self, prompt: &str) -> Result<LayoutRequest> {
        (**self).resolve(prompt)
    }
}

impl<R: LayoutResolver + ?Sized> LayoutResolver for Box<R> {
    fn resolve(&self, prompt: &str) -> Result<LayoutRequest> {
        (**self).resolve(prompt)
    }
}
