use super::request::{ApiRequest, RawResponse, RequestBody};
use super::Transport;
use crate::client::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use url::Url;

/// Response bodies kept on non-2xx errors are cut to this many bytes.
const STATUS_BODY_LIMIT: usize = 1000;

/// reqwest-backed transport built once from a [`ClientConfig`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        // Zero keeps reqwest's default for every timeout.
        if config.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        }
        if config.response_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.response_timeout_secs));
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                "failed to build HTTP client",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("http_transport"),
            )
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: Url,
        request: &ApiRequest,
    ) -> std::result::Result<RawResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        req = match &request.body {
            RequestBody::Empty => req,
            RequestBody::Form(fields) => req.form(fields),
            RequestBody::Json(value) => req.json(value),
        };

        let resp = req.send().await.map_err(TransportError::from_reqwest)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(TransportError::from_reqwest)?;

        if !status.is_success() {
            let mut text = String::from_utf8_lossy(&body).into_owned();
            if text.len() > STATUS_BODY_LIMIT {
                let mut cut = STATUS_BODY_LIMIT;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("unknown host: {0}")]
    UnknownHost(String),

    #[error("response body could not be decoded: {0}")]
    Decode(String),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Sort a reqwest failure into the variant the classifier understands.
    ///
    /// reqwest only exposes coarse flags, so DNS and TLS failures are told
    /// apart from plain connect failures by walking the source chain. An io
    /// error kind in the chain wins over any text marker.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout(err.to_string());
        }
        if err.is_decode() {
            return TransportError::Decode(err.to_string());
        }

        let chain = ErrorChain::collect(&err);
        match chain.io_kind {
            Some(io::ErrorKind::TimedOut) => return TransportError::Timeout(err.to_string()),
            Some(
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted,
            ) => return TransportError::Connect(err.to_string()),
            _ => {}
        }
        match classify_chain_text(&chain.text) {
            ChainHint::Dns => return TransportError::UnknownHost(err.to_string()),
            ChainHint::Tls => return TransportError::Tls(err.to_string()),
            ChainHint::None => {}
        }
        if err.is_connect() {
            return TransportError::Connect(err.to_string());
        }

        TransportError::Http(err)
    }

    /// Network-level failures that a re-issue may fix.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Connect(_) | TransportError::Timeout(_) | TransportError::UnknownHost(_)
        )
    }
}

struct ErrorChain {
    io_kind: Option<io::ErrorKind>,
    text: String,
}

impl ErrorChain {
    /// Walk the sources of `err`. The top-level message is skipped: it embeds
    /// the request URL, which must not be read as a failure marker.
    fn collect(err: &reqwest::Error) -> Self {
        let mut io_kind = None;
        let mut parts = Vec::new();
        let mut current: Option<&(dyn StdError + 'static)> = err.source();
        while let Some(e) = current {
            if io_kind.is_none() {
                if let Some(io_err) = e.downcast_ref::<io::Error>() {
                    io_kind = Some(io_err.kind());
                }
            }
            parts.push(e.to_string().to_lowercase());
            current = e.source();
        }
        Self {
            io_kind,
            text: parts.join(" | "),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ChainHint {
    Dns,
    Tls,
    None,
}

fn classify_chain_text(text: &str) -> ChainHint {
    const DNS_MARKERS: &[&str] = &[
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
        "temporary failure in name resolution",
    ];
    const TLS_MARKERS: &[&str] = &["certificate", "tls", "handshake", "invalid peer"];

    if DNS_MARKERS.iter().any(|m| text.contains(m)) {
        ChainHint::Dns
    } else if TLS_MARKERS.iter().any(|m| text.contains(m)) {
        ChainHint::Tls
    } else {
        ChainHint::None
    }
}
