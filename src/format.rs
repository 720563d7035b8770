use crate::error::ConvertError;
use std::fmt;
use std::str::FromStr;

/// Document formats the converter knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Docx,
    Xlsx,
    Pdf,
}

impl Format {
    /// All formats, in the order the selector shows them
    pub const ALL: [Format; 3] = [Format::Docx, Format::Xlsx, Format::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Docx => "docx",
            Format::Xlsx => "xlsx",
            Format::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.trim().trim_start_matches('.').to_lowercase();
        Format::ALL
            .into_iter()
            .find(|f| f.extension() == ext)
            .ok_or_else(|| ConvertError::InvalidRequest(format!("Unknown format: {}", s)))
    }
}
