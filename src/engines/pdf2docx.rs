use super::{probe, publish, run_converter, staging_dir, ConvertEngine, EngineType};
use crate::error::Result;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;

/// PDF to DOCX through the `pdf2docx` command line tool
pub struct Pdf2DocxEngine {
    /// Path to the pdf2docx executable
    pdf2docx_path: Option<String>,
}

impl Pdf2DocxEngine {
    pub fn new() -> Self {
        Self {
            pdf2docx_path: None,
        }
    }

    pub fn with_pdf2docx_path(mut self, path: impl Into<String>) -> Self {
        self.pdf2docx_path = Some(path.into());
        self
    }

    fn get_pdf2docx_path(&self) -> String {
        if let Some(path) = &self.pdf2docx_path {
            return path.clone();
        }

        if let Ok(path) = std::env::var("PDF2DOCX_PATH") {
            return path;
        }

        "pdf2docx".to_string()
    }
}

impl Default for Pdf2DocxEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConvertEngine for Pdf2DocxEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::PdfToDocx
    }

    fn name(&self) -> &str {
        "pdf2docx"
    }

    async fn is_available(&self) -> bool {
        probe(&self.get_pdf2docx_path(), "--help").await
    }

    async fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        let staging = staging_dir(destination)?;
        let staged = staging.path().join("output.docx");

        info!("Converting {} to DOCX using pdf2docx", source.display());

        run_converter(
            &self.get_pdf2docx_path(),
            self.name(),
            [
                OsStr::new("convert"),
                source.as_os_str(),
                staged.as_os_str(),
            ],
        )
        .await?;

        publish(&staged, destination, self.name()).await
    }
}
