//! Field validation and render context resolution

mod coerce;
mod context;

pub use coerce::{coerce_field, describe};
pub use context::{resolve_context, RenderContext};
