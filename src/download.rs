use std::io::Read;
use std::time::Duration;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, ETAG, IF_NONE_MATCH};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::marker::{weak_validator, Marker};
use crate::store::ContentStore;
use crate::untar;

/// Media type asking the content host for the raw file instead of its JSON description.
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

const LOG_TARGET: &str = "download";

/// What a single fetch attempt produced, before any status policy is applied.
pub struct FetchResponse {
    /// Final request URL, reported in errors.
    pub url: String,
    pub status: u16,
    /// Value of the `ETag` response header, if any.
    pub etag: Option<String>,
    pub body: Box<dyn Read>,
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResponse")
            .field("url", &self.url)
            .field("status", &self.status)
            .field("etag", &self.etag)
            .finish_non_exhaustive()
    }
}

/// Performs the conditional request for the dataset archive.
pub trait Fetch {
    /// `etag` is the last known entity tag, `None` on first sync.
    fn fetch(&self, etag: Option<&str>) -> Result<FetchResponse>;
}

/// Blocking HTTP implementation of [`Fetch`].
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpFetcher {
    pub fn new(url: String, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dhub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url, token })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.remote.url(), config.token.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, etag: Option<&str>) -> Result<FetchResponse> {
        let mut request = self.client.get(&self.url).header(ACCEPT, RAW_MEDIA_TYPE);
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, weak_validator(etag));
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        log::info!(target: LOG_TARGET, "Fetching {}", self.url);
        let response = request.send()?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(FetchResponse {
            url: response.url().to_string(),
            status: response.status().as_u16(),
            etag,
            body: Box::new(response),
        })
    }
}

/// Result of [`Download::ensure_synced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Already synced today; no request was made.
    Fresh,
    /// The host reported no change; only the marker was refreshed.
    NotModified,
    /// A new archive was extracted.
    Updated { files: usize },
}

/// Keeps the local dataset in sync with the remote archive.
///
/// Owns the freshness policy: at most one fetch per UTC day, and the marker only
/// advances after a confirmed 304 or a fully extracted 200.
#[derive(Debug)]
pub struct Download<'a, F: Fetch> {
    store: &'a ContentStore,
    fetcher: &'a F,
}

impl<'a, F: Fetch> Download<'a, F> {
    pub fn new(store: &'a ContentStore, fetcher: &'a F) -> Self {
        Self { store, fetcher }
    }

    /// Makes sure the store holds the dataset as of `today`.
    ///
    /// # Errors
    ///
    /// Transport failures, statuses other than 200/304, and extraction failures. None of
    /// them update the marker, so the next invocation fetches again.
    pub fn ensure_synced(&self, today: NaiveDate) -> Result<SyncOutcome> {
        let marker = Marker::load(self.store);
        if marker.as_ref().is_some_and(|m| m.is_current(today)) {
            log::debug!(target: LOG_TARGET, "Dataset already synced on {today}");
            return Ok(SyncOutcome::Fresh);
        }

        let previous = marker.and_then(|m| m.etag);
        let response = self.fetcher.fetch(previous.as_deref())?;

        match response.status {
            304 => {
                log::info!(target: LOG_TARGET, "Dataset not modified");
                Marker::new(response.etag.or(previous), today).save(self.store)?;
                Ok(SyncOutcome::NotModified)
            }
            200 => {
                let files = untar::unpack(self.store.root(), response.body)?;
                Marker::new(response.etag, today).save(self.store)?;
                Ok(SyncOutcome::Updated { files })
            }
            status => Err(Error::UnexpectedStatus {
                url: response.url,
                status,
            }),
        }
    }
}
