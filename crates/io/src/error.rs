use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or is not a valid workbook.
    Open { path: String, message: String },
    /// File opened but its contents could not be parsed.
    Read { path: String, message: String },
    /// Writing or renaming the output failed.
    Write { path: String, message: String },
    /// Extension is not a supported table format.
    UnsupportedFormat { path: String, extension: String },
    /// Two group keys map to the same artifact file name.
    ArtifactNameClash { file_name: String, keys: (String, String) },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => write!(f, "cannot open {path}: {message}"),
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
            Self::UnsupportedFormat { path, extension } => {
                if extension.is_empty() {
                    write!(f, "{path}: file has no extension")
                } else {
                    write!(f, "{path}: unsupported format '.{extension}'")
                }
            }
            Self::ArtifactNameClash { file_name, keys } => write!(
                f,
                "group keys '{}' and '{}' both map to artifact '{file_name}'",
                keys.0, keys.1
            ),
        }
    }
}

impl std::error::Error for IoError {}
