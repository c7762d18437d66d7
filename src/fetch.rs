//! Source fetching and text decoding.
//!
//! The ingestion pipeline only needs "give me the text behind this source
//! identifier"; everything about transport lives behind [`TextFetcher`].
//! Sources are either plain file paths or `http(s)://` URLs, and fetched
//! bytes are decoded through `encoding_rs` (UTF-8 unless configured
//! otherwise).

use std::{fs, io, time::Duration};

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use thiserror::Error;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("reading '{path}': {cause}")]
    Io { path: String, cause: io::Error },
    #[error("requesting '{url}': {cause}")]
    Http { url: String, cause: reqwest::Error },
    #[error("building HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("decoding '{source_id}' as {encoding}")]
    Decode {
        source_id: String,
        encoding: &'static str,
    },
}

/// Transport seam: resolves a source identifier to its text content.
pub trait TextFetcher {
    fn fetch_text(&self, source: &str) -> Result<String, FetchError>;
}

pub fn decode_bytes(
    bytes: &[u8],
    encoding: &'static Encoding,
    source_id: &str,
) -> Result<String, FetchError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(FetchError::Decode {
            source_id: source_id.to_string(),
            encoding: encoding.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Copy)]
pub struct FileFetcher {
    pub encoding: &'static Encoding,
}

impl Default for FileFetcher {
    fn default() -> Self {
        Self { encoding: UTF_8 }
    }
}

impl TextFetcher for FileFetcher {
    fn fetch_text(&self, source: &str) -> Result<String, FetchError> {
        debug!("Reading source file '{source}'");
        let bytes = fs::read(source).map_err(|cause| FetchError::Io {
            path: source.to_string(),
            cause,
        })?;
        decode_bytes(&bytes, self.encoding, source)
    }
}

/// Fetches sources over HTTP with a bounded request timeout, so a stalled
/// server resolves to a failure instead of hanging ingestion.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    encoding: &'static Encoding,
}

impl HttpFetcher {
    pub fn new(encoding: &'static Encoding) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, encoding })
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, source: &str) -> Result<String, FetchError> {
        debug!("Fetching source URL '{source}'");
        let http_err = |cause| FetchError::Http {
            url: source.to_string(),
            cause,
        };
        let response = self
            .client
            .get(source)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(http_err)?;
        let bytes = response.bytes().map_err(http_err)?;
        decode_bytes(&bytes, self.encoding, source)
    }
}

/// Dispatches per source: `http(s)://` identifiers go over HTTP, everything
/// else is treated as a file path.
#[derive(Debug)]
pub struct AutoFetcher {
    file: FileFetcher,
    http: HttpFetcher,
}

impl AutoFetcher {
    pub fn new(encoding: &'static Encoding) -> Result<Self, FetchError> {
        Ok(Self {
            file: FileFetcher { encoding },
            http: HttpFetcher::new(encoding)?,
        })
    }
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

impl TextFetcher for AutoFetcher {
    fn fetch_text(&self, source: &str) -> Result<String, FetchError> {
        if is_url(source) {
            self.http.fetch_text(source)
        } else {
            self.file.fetch_text(source)
        }
    }
}
