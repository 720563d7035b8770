//! Convert documents between DOCX, XLSX and PDF.
//!
//! Conversions are handed to external tools (LibreOffice, pdf2docx) whose
//! presence is checked once when the [`Registry`] is built. Same-format
//! requests are plain copies.

pub mod dispatcher;
pub mod engines;
pub mod error;
pub mod format;
pub mod opener;

pub use dispatcher::{ConversionRequest, Converted, Dispatcher, Registry, Route};
pub use engines::{ConvertEngine, EngineType};
pub use error::{ConvertError, FailureKind, Result};
pub use format::Format;
