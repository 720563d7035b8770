use super::{probe, publish, run_converter, staging_dir, ConvertEngine, EngineType};
use crate::error::{ConvertError, Result};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;

/// Office documents to PDF through a headless LibreOffice
pub struct LibreOfficeEngine {
    engine_type: EngineType,
    /// Path to LibreOffice/soffice executable
    soffice_path: Option<String>,
}

impl LibreOfficeEngine {
    pub fn docx_to_pdf() -> Self {
        Self {
            engine_type: EngineType::DocxToPdf,
            soffice_path: None,
        }
    }

    pub fn xlsx_to_pdf() -> Self {
        Self {
            engine_type: EngineType::XlsxToPdf,
            soffice_path: None,
        }
    }

    pub fn with_soffice_path(mut self, path: impl Into<String>) -> Self {
        self.soffice_path = Some(path.into());
        self
    }

    fn get_soffice_path(&self) -> String {
        // Explicit path from the builder wins
        if let Some(path) = &self.soffice_path {
            return path.clone();
        }

        // Then the environment
        if let Ok(path) = std::env::var("SOFFICE_PATH") {
            return path;
        }

        // Otherwise the usual install location for this OS
        if cfg!(target_os = "macos") {
            "/Applications/LibreOffice.app/Contents/MacOS/soffice".to_string()
        } else if cfg!(target_os = "windows") {
            r"C:\Program Files\LibreOffice\program\soffice.exe".to_string()
        } else {
            // Distro packages ship either name
            for path in &["/usr/bin/soffice", "/usr/bin/libreoffice"] {
                if Path::new(path).exists() {
                    return path.to_string();
                }
            }
            "soffice".to_string()
        }
    }
}

#[async_trait]
impl ConvertEngine for LibreOfficeEngine {
    fn engine_type(&self) -> EngineType {
        self.engine_type
    }

    fn name(&self) -> &str {
        "LibreOffice"
    }

    async fn is_available(&self) -> bool {
        probe(&self.get_soffice_path(), "--version").await
    }

    async fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        let staging = staging_dir(destination)?;

        info!(
            "Converting {} to PDF using LibreOffice",
            source.display()
        );

        run_converter(
            &self.get_soffice_path(),
            self.name(),
            [
                OsStr::new("--headless"),
                OsStr::new("--convert-to"),
                OsStr::new("pdf"),
                OsStr::new("--outdir"),
                staging.path().as_os_str(),
                source.as_os_str(),
            ],
        )
        .await?;

        // LibreOffice names the PDF after the input's stem
        let stem = source.file_stem().ok_or_else(|| {
            ConvertError::ConversionFailed(format!("{} has no file name", source.display()))
        })?;
        let mut produced = stem.to_os_string();
        produced.push(".pdf");

        publish(&staging.path().join(produced), destination, self.name()).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_soffice(dir: &Path, body: &str) -> String {
        let path = dir.join("soffice");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_str().unwrap().to_string()
    }

    const WORKING: &str = r#"
if [ "$1" = "--version" ]; then echo "LibreOffice 7.6"; exit 0; fi
name=$(basename "$6")
cp "$6" "$5/${name%.*}.pdf"
"#;

    #[tokio::test]
    async fn test_converts_into_destination() {
        let dir = tempfile::tempdir().unwrap();
        let engine =
            LibreOfficeEngine::docx_to_pdf().with_soffice_path(fake_soffice(dir.path(), WORKING));
        let source = dir.path().join("report.docx");
        let destination = dir.path().join("out").join("final.pdf");
        std::fs::create_dir(dir.path().join("out")).unwrap();
        std::fs::write(&source, b"docx bytes").unwrap();

        assert!(engine.is_available().await);
        engine.convert(&source, &destination).await.unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"docx bytes");
        // staging directory is gone
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let engine = LibreOfficeEngine::xlsx_to_pdf().with_soffice_path(fake_soffice(
            dir.path(),
            "echo 'source file could not be loaded' >&2\nexit 1",
        ));
        let source = dir.path().join("data.xlsx");
        let destination = dir.path().join("data.pdf");
        std::fs::write(&source, b"not a workbook").unwrap();

        let err = engine.convert(&source, &destination).await.unwrap_err();
        match err {
            ConvertError::ConversionFailed(msg) => {
                assert!(msg.contains("could not be loaded"), "{}", msg)
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!destination.exists());
        assert!(!engine.is_available().await);
    }

    #[test]
    fn test_variants_cover_office_pairs() {
        assert_eq!(LibreOfficeEngine::docx_to_pdf().engine_type(), EngineType::DocxToPdf);
        assert_eq!(LibreOfficeEngine::xlsx_to_pdf().engine_type(), EngineType::XlsxToPdf);
    }
}
