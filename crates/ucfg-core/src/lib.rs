//! # ucfg-core - Config Model, Form Renderer and Merger
//!
//! Foundation crate for the Uncrustify configurator. Everything here is pure
//! text in, text out: no process spawning, no file access beyond logging.
//!
//! ## Public API
//!
//! ### Parsing (`parser`, `types`)
//! - [`parse()`] - Config text to [`ParsedConfig`] (sections of typed fields)
//! - [`ConfigLine`] - Classification of a single config line
//! - [`TypeHint`] - String / Number / Boolean / Enumerated, from the `# comment`
//! - [`FieldDescriptor`], [`Section`]
//!
//! ### Version Detection (`version`)
//! - [`detect_format_version()`], [`extract_version()`], [`check_version()`]
//! - [`VersionStatus`] - Current / Outdated / Unknown
//!
//! ### Rendering (`markup`, `render`)
//! - [`MarkupNode`] - Tree of tags with ordered attributes
//! - [`render()`], [`render_sections()`] - Parsed config to form markup
//! - [`to_document()`] - Serialize a tree as a complete HTML page
//!
//! ### Editing (`form`, `merge`)
//! - [`FormSubmission`] - Per-field control state, serialized to an [`EditPatch`]
//! - [`merge()`] - Apply an [`EditPatch`] to the original text
//!
//! ### Error Handling (`error`)
//! - [`Error`], [`Result`], [`ResultExt`]
//!
//! ## Prelude
//!
//! ```rust
//! use ucfg_core::prelude::*;
//! ```

pub mod error;
pub mod form;
pub mod logging;
pub mod markup;
pub mod merge;
pub mod parser;
pub mod render;
pub mod types;
pub mod version;

/// Prelude for common imports used throughout all configurator crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use form::{serialize_field, ControlValue, FormSubmission, SubmittedField};
pub use markup::{serialize, to_document, MarkupNode};
pub use merge::{merge, replace_directive, EditPatch, PatchValue};
pub use parser::{parse, ConfigLine};
pub use render::{render, render_sections, RenderOptions};
pub use types::{FieldDescriptor, ParsedConfig, Section, TypeHint};
pub use version::{check_version, detect_format_version, extract_version, VersionStatus};
