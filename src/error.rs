use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a run can fail. All of them abort the run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to download dump from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("bad status from {url}: {status}")]
    BadStatus { url: String, status: StatusCode },

    #[error("failed to read decompressed dump stream")]
    Decompress(#[source] quick_xml::Error),

    #[error("XML token error at byte {position}")]
    Tokenize {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("failed to decode record element at byte {position}")]
    Decode {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("dump ended inside record element (title: {title:?})")]
    UnexpectedEof { title: String },

    #[error("failed to write output document")]
    Write(#[source] quick_xml::Error),

    #[error("failed to create output file: {}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn write_io(err: std::io::Error) -> Self {
        ExtractError::Write(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
