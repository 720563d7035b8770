mod libreoffice;
mod pdf2docx;

pub use libreoffice::LibreOfficeEngine;
pub use pdf2docx::Pdf2DocxEngine;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

/// Which conversion an engine performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineType {
    DocxToPdf,
    XlsxToPdf,
    PdfToDocx,
}

impl EngineType {
    pub fn pair(self) -> (Format, Format) {
        match self {
            EngineType::DocxToPdf => (Format::Docx, Format::Pdf),
            EngineType::XlsxToPdf => (Format::Xlsx, Format::Pdf),
            EngineType::PdfToDocx => (Format::Pdf, Format::Docx),
        }
    }
}

/// Trait that all external converters implement.
///
/// An engine handles exactly one ordered format pair and is treated as a
/// black box: it either writes a complete `destination` or returns an error.
#[async_trait]
pub trait ConvertEngine: Send + Sync {
    /// Get the engine type
    fn engine_type(&self) -> EngineType;

    /// Human readable name of the external converter
    fn name(&self) -> &str;

    /// The (source, destination) formats this engine converts between
    fn pair(&self) -> (Format, Format) {
        self.engine_type().pair()
    }

    /// Check if the external converter is installed
    async fn is_available(&self) -> bool;

    /// Convert `source` into `destination`, overwriting it
    async fn convert(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Run `program --flag` and report whether it exited successfully.
pub(crate) async fn probe(program: &str, flag: &str) -> bool {
    Command::new(program)
        .arg(flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run an external converter to completion, turning a failed launch or a
/// non-zero exit into `ConversionFailed`.
pub(crate) async fn run_converter<I, S>(program: &str, label: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ConvertError::ConversionFailed(format!("Failed to run {}: {}", label, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match stderr.trim() {
            "" => output.status.to_string(),
            msg => msg.to_string(),
        };
        return Err(ConvertError::ConversionFailed(format!(
            "{} conversion failed: {}",
            label, detail
        )));
    }

    Ok(())
}

/// Scratch directory beside `destination`, so the finished file can be
/// renamed into place without crossing file systems.
pub(crate) fn staging_dir(destination: &Path) -> Result<TempDir> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok(tempfile::Builder::new()
        .prefix(".fileconv-")
        .tempdir_in(parent)?)
}

/// Move a finished file from the staging directory to `destination`.
pub(crate) async fn publish(staged: &Path, destination: &Path, label: &str) -> Result<()> {
    if !tokio::fs::try_exists(staged).await.unwrap_or(false) {
        return Err(ConvertError::ConversionFailed(format!(
            "{} finished without producing {}",
            label,
            staged.display()
        )));
    }
    tokio::fs::rename(staged, destination).await?;
    Ok(())
}
