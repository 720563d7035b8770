use crate::engines::{
    publish, staging_dir, ConvertEngine, EngineType, LibreOfficeEngine, Pdf2DocxEngine,
};
use crate::error::{ConvertError, Result};
use crate::format::Format;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One user action: convert `source` (in `source_format`) into `destination`.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_format: Format,
    pub destination_format: Format,
}

impl ConversionRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        source_format: Format,
        destination_format: Format,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            source_format,
            destination_format,
        }
    }

    fn validate(&self) -> Result<()> {
        if is_blank(&self.source) {
            return Err(ConvertError::InvalidRequest(
                "No source file selected".to_string(),
            ));
        }
        if is_blank(&self.destination) {
            return Err(ConvertError::InvalidRequest(
                "No destination path given".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// How a successful conversion was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Same format, bytes copied to the destination
    Copied,
    /// Same format and the destination is the source itself
    Unchanged,
    /// Handed to an external engine
    Delegated(EngineType),
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub destination: PathBuf,
    pub route: Route,
}

struct Entry {
    engine: Arc<dyn ConvertEngine>,
    available: bool,
}

/// Format pair to engine map with availability resolved up front.
///
/// Built once and never mutated; a pair maps to at most one engine.
pub struct Registry {
    entries: HashMap<(Format, Format), Entry>,
}

impl Registry {
    /// Register the bundled engines and check which converters are installed
    pub async fn probe() -> Self {
        let engines: Vec<Arc<dyn ConvertEngine>> = vec![
            Arc::new(LibreOfficeEngine::docx_to_pdf()),
            Arc::new(LibreOfficeEngine::xlsx_to_pdf()),
            Arc::new(Pdf2DocxEngine::new()),
        ];

        let mut builder = Registry::builder();
        for engine in engines {
            let available = engine.is_available().await;
            let status = if available { "✓" } else { "✗" };
            let (from, to) = engine.pair();
            tracing::info!("{} {} engine - {} → {}", status, engine.name(), from, to);
            builder = builder.engine(engine, available);
        }
        builder.build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            entries: HashMap::new(),
        }
    }

    pub fn engine_for(&self, from: Format, to: Format) -> Option<&Arc<dyn ConvertEngine>> {
        self.entries.get(&(from, to)).map(|e| &e.engine)
    }

    pub fn is_available(&self, from: Format, to: Format) -> bool {
        self.entries
            .get(&(from, to))
            .map(|e| e.available)
            .unwrap_or(false)
    }

    /// Registered pairs with their availability, in a stable order
    pub fn pairs(&self) -> Vec<(Format, Format, bool)> {
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(&(from, to), e)| (from, to, e.available))
            .collect();
        pairs.sort_by_key(|&(from, to, _)| (from as u8, to as u8));
        pairs
    }
}

pub struct RegistryBuilder {
    entries: HashMap<(Format, Format), Entry>,
}

impl RegistryBuilder {
    /// Register `engine` for its pair, replacing any earlier engine for it
    pub fn engine(mut self, engine: Arc<dyn ConvertEngine>, available: bool) -> Self {
        if let Some(old) = self
            .entries
            .insert(engine.pair(), Entry { engine, available })
        {
            warn!("{} engine replaced for its format pair", old.engine.name());
        }
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}

/// Picks and runs the conversion for a request
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Convert the request's source into its destination.
    ///
    /// Same-format requests are copied without touching the registry. Every
    /// other pair goes to its registered engine, and the call resolves only
    /// once that engine has finished. Failures come back as one of the four
    /// [`ConvertError`] kinds; nothing is retried.
    pub async fn dispatch(&self, request: &ConversionRequest) -> Result<Converted> {
        request.validate()?;

        let from = request.source_format;
        let to = request.destination_format;

        if from == to {
            return identity_copy(&request.source, &request.destination).await;
        }

        let entry = self
            .registry
            .entries
            .get(&(from, to))
            .ok_or(ConvertError::UnsupportedConversion { from, to })?;

        if !entry.available {
            return Err(ConvertError::AdapterUnavailable(
                entry.engine.name().to_string(),
            ));
        }

        debug!(
            "Dispatching {} → {} to {}",
            from,
            to,
            entry.engine.name()
        );

        let existed = tokio::fs::try_exists(&request.destination)
            .await
            .unwrap_or(true);

        match entry
            .engine
            .convert(&request.source, &request.destination)
            .await
        {
            Ok(()) => Ok(Converted {
                destination: request.destination.clone(),
                route: Route::Delegated(entry.engine.engine_type()),
            }),
            Err(err) => {
                if !existed {
                    remove_partial(&request.destination).await;
                }
                Err(normalize(err))
            }
        }
    }
}

async fn identity_copy(source: &Path, destination: &Path) -> Result<Converted> {
    // A missing source fails here, even when it is also the destination
    tokio::fs::metadata(source).await?;

    if tokio::fs::try_exists(destination).await.unwrap_or(false)
        && same_file::is_same_file(source, destination)?
    {
        debug!("{} is its own destination, nothing to copy", source.display());
        return Ok(Converted {
            destination: destination.to_path_buf(),
            route: Route::Unchanged,
        });
    }

    debug!("Copying {} to {}", source.display(), destination.display());
    let staging = staging_dir(destination)?;
    let staged = staging.path().join("copy");
    tokio::fs::copy(source, &staged).await?;
    publish(&staged, destination, "Copy").await?;

    Ok(Converted {
        destination: destination.to_path_buf(),
        route: Route::Copied,
    })
}

async fn remove_partial(destination: &Path) {
    if tokio::fs::try_exists(destination).await.unwrap_or(false) {
        debug!("Removing partial output {}", destination.display());
        if let Err(e) = tokio::fs::remove_file(destination).await {
            warn!("Could not remove {}: {}", destination.display(), e);
        }
    }
}

/// Engine errors always surface as `ConversionFailed` with a message.
fn normalize(err: ConvertError) -> ConvertError {
    let message = match err {
        ConvertError::ConversionFailed(msg) => msg,
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        ConvertError::ConversionFailed("converter reported an error".to_string())
    } else {
        ConvertError::ConversionFailed(message)
    }
}
