//! Errors that abort a conversion run

use std::path::PathBuf;

use thiserror::Error;

/// A fatal error encountered while reading assets or writing the UFO.
///
/// Blank cells and characters missing from every sheet are not errors; they
/// are skipped and counted in the [`BuildSummary`](crate::BuildSummary).
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed asset '{}': {reason}", path.display())]
    MalformedAsset { path: PathBuf, reason: String },

    #[error("missing asset '{}'", path.display())]
    MissingAsset { path: PathBuf },

    #[error("descriptor '{}' includes itself", path.display())]
    ReferenceCycle { path: PathBuf },

    #[error("descriptor '{}' exceeds the maximum reference depth", path.display())]
    NestingTooDeep { path: PathBuf },

    #[error("scale {scale} is outside 1..={max}")]
    ScaleOutOfRange { scale: i32, max: i32 },

    #[error("i/o error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::MalformedAsset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Map an error from opening `path`, treating "not found" as a missing asset.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::MissingAsset { path }
        } else {
            Error::Io { path, source }
        }
    }
}
