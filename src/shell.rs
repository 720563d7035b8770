use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use fileconv::{opener, ConversionRequest, ConvertError, Dispatcher, FailureKind, Format};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Terminal form in front of the dispatcher: pick the input, pick the
/// output, convert, report, optionally open the result.
pub struct Shell {
    dispatcher: Dispatcher,
    open_result: bool,
}

impl Shell {
    pub fn new(dispatcher: Dispatcher, open_result: bool) -> Self {
        Self {
            dispatcher,
            open_result,
        }
    }

    pub async fn run(&self) -> Result<()> {
        println!("=== File Converter ===");
        self.print_converters();

        // docx in, pdf out until the user picks something else
        let mut source_format = Format::Docx;
        let mut destination_format = Format::Pdf;

        loop {
            source_format = select_format("Source format", source_format)?;
            let source: String = Input::new()
                .with_prompt(format!("{} file", source_format.extension().to_uppercase()))
                .allow_empty(true)
                .interact_text()?;
            let source = source.trim().to_string();

            destination_format = select_format("Destination format", destination_format)?;
            let destination: String = Input::new()
                .with_prompt("Save as")
                .default(suggest_destination(&source, destination_format))
                .allow_empty(true)
                .interact_text()?;
            let destination = destination.trim().to_string();

            let request =
                ConversionRequest::new(source, destination, source_format, destination_format);
            self.convert(&request).await;

            if !Confirm::new()
                .with_prompt("Convert another file?")
                .default(false)
                .interact()?
            {
                return Ok(());
            }
        }
    }

    async fn convert(&self, request: &ConversionRequest) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!(
            "Converting {} → {}",
            request.source_format, request.destination_format
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let outcome = self.dispatcher.dispatch(request).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(done) => {
                info!("Saved {} ({:?})", done.destination.display(), done.route);
                println!("✓ File saved:\n  {}", done.destination.display());
                if self.open_result {
                    opener::open_file(&done.destination);
                }
            }
            Err(err) => {
                error!("{}", err);
                println!("✗ {}", err);
                if let Some(hint) = hint(&err) {
                    println!("  {}", hint);
                }
            }
        }
    }

    fn print_converters(&self) {
        for (from, to, available) in self.dispatcher.registry().pairs() {
            let status = if available { "✓" } else { "✗ not installed" };
            println!("  {} → {}  {}", from, to, status);
        }
    }
}

fn select_format(prompt: &str, current: Format) -> Result<Format> {
    let items: Vec<_> = Format::ALL.iter().map(|f| f.extension()).collect();
    let default = Format::ALL.iter().position(|&f| f == current).unwrap_or(0);
    let index = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact()?;
    Ok(Format::ALL[index])
}

/// `source` with its extension swapped for `format`'s, or empty when there
/// is no source yet.
fn suggest_destination(source: &str, format: Format) -> String {
    if source.is_empty() {
        return String::new();
    }
    Path::new(source)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned()
}

fn hint(err: &ConvertError) -> Option<&'static str> {
    match err.kind() {
        FailureKind::AdapterUnavailable => {
            Some("Install the converter (or set SOFFICE_PATH / PDF2DOCX_PATH) and restart.")
        }
        FailureKind::UnsupportedConversion => {
            Some("Supported: docx → pdf, xlsx → pdf, pdf → docx, or the same format.")
        }
        FailureKind::InvalidRequest | FailureKind::ConversionFailed => None,
    }
}
