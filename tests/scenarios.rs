use async_trait::async_trait;
use fileconv::{
    ConversionRequest, ConvertEngine, ConvertError, Dispatcher, EngineType, Format, Registry,
    Route,
};
use std::path::Path;
use std::sync::Arc;

/// Writes a fixed body to the destination, like a converter that always works.
struct FakeConverter(EngineType);

#[async_trait]
impl ConvertEngine for FakeConverter {
    fn engine_type(&self) -> EngineType {
        self.0
    }

    fn name(&self) -> &str {
        "fake"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn convert(&self, _source: &Path, destination: &Path) -> fileconv::Result<()> {
        tokio::fs::write(destination, b"converted").await?;
        Ok(())
    }
}

fn dispatcher() -> Dispatcher {
    let registry = [
        EngineType::DocxToPdf,
        EngineType::XlsxToPdf,
        EngineType::PdfToDocx,
    ]
    .into_iter()
    .fold(Registry::builder(), |b, t| {
        b.engine(Arc::new(FakeConverter(t)), true)
    })
    .build();
    Dispatcher::new(registry)
}

#[tokio::test]
async fn test_report_docx_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.docx");
    let destination = dir.path().join("report.pdf");
    std::fs::write(&source, b"PK\x03\x04").unwrap();

    let done = dispatcher()
        .dispatch(&ConversionRequest::new(&source, &destination, Format::Docx, Format::Pdf))
        .await
        .unwrap();

    assert_eq!(done.destination, destination);
    assert_eq!(done.route, Route::Delegated(EngineType::DocxToPdf));
    assert!(destination.exists());
}

#[tokio::test]
async fn test_data_xlsx_to_docx_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("data.xlsx");
    let destination = dir.path().join("data.docx");
    std::fs::write(&source, b"PK\x03\x04").unwrap();

    let err = dispatcher()
        .dispatch(&ConversionRequest::new(&source, &destination, Format::Xlsx, Format::Docx))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::UnsupportedConversion {
            from: Format::Xlsx,
            to: Format::Docx
        }
    ));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_same_format_is_a_byte_copy() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.docx");
    let destination = dir.path().join("b.docx");
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    std::fs::write(&source, &bytes).unwrap();

    let done = dispatcher()
        .dispatch(&ConversionRequest::new(&source, &destination, Format::Docx, Format::Docx))
        .await
        .unwrap();

    assert_eq!(done.destination, destination);
    assert_eq!(done.route, Route::Copied);
    assert_eq!(std::fs::read(&destination).unwrap(), bytes);
}
