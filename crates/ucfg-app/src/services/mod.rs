//! Service layer for the configurator
//!
//! - [`FormatterService`]: version query, formatting and config upgrade
//! - [`ExecutableFormatter`]: the implementation over the real executable

mod formatter_service;

pub use formatter_service::{ExecutableFormatter, FormatterService, LocalFormatterService};
