//! HTTP client for the market-data quote and order-book endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{BookSnapshot, QuoteError, QuoteSource, Result, TopOfBook};
use crate::config::BrokerConfig;

/// Header carrying the API key ID.
const KEY_ID_HEADER: &str = "apca-api-key-id";

/// Header carrying the API secret.
const SECRET_HEADER: &str = "apca-api-secret-key";

/// Configuration for creating a new Client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    /// Zero keeps the HTTP library default.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: String, api_key: String, api_secret: String) -> Self {
        Self {
            base_url,
            api_key,
            api_secret,
            timeout: Duration::ZERO,
        }
    }

    pub fn from_broker(broker: &BrokerConfig) -> Self {
        Self {
            base_url: broker.base_url.clone(),
            api_key: broker.api_key.clone(),
            api_secret: broker.api_secret.clone(),
            timeout: broker.request_timeout,
        }
    }
}

/// HTTP client for the quote API.
/// Sends both credential headers on every request and treats any status
/// other than 200 as a failure.
pub struct Client {
    base_url: Url,
    http_client: HttpClient,
}

impl Client {
    /// Creates a new quote API client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_builder(config, HttpClient::builder())
    }

    /// Creates a client from a caller-prepared reqwest builder.
    pub(crate) fn with_builder(
        config: ClientConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| QuoteError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(QuoteError::InvalidUrl(config.base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(KEY_ID_HEADER, header_value(&config.api_key, KEY_ID_HEADER)?);
        headers.insert(SECRET_HEADER, header_value(&config.api_secret, SECRET_HEADER)?);

        let mut builder = builder.default_headers(headers);
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }

        Ok(Self {
            base_url,
            http_client: builder.build()?,
        })
    }

    /// Builds `{base}/stocks/{symbol}/{endpoint}` with the symbol as one
    /// encoded path segment.
    fn endpoint_url(&self, symbol: &str, endpoint: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QuoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["stocks", symbol, endpoint]);
        Ok(url)
    }

    /// Sends a GET request and returns the body of a 200 response.
    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        debug!(url = %url, "sending request");

        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            let err = QuoteError::status(status.as_u16(), &body);
            warn!(url = %url, error = %err, "quote api error");
            return Err(err);
        }

        Ok(body.to_vec())
    }

    /// Fetches level-2 depth for a symbol.
    pub async fn get_book(&self, symbol: &str) -> Result<Option<BookSnapshot>> {
        #[derive(Deserialize)]
        struct BookResponse {
            #[serde(default)]
            snapshot: Option<BookSnapshot>,
        }

        let mut url = self.endpoint_url(symbol, "book")?;
        url.query_pairs_mut().append_pair("level", "2");

        let body = self.get(url).await?;
        let resp: BookResponse = serde_json::from_slice(&body)?;
        Ok(resp.snapshot)
    }

    /// Fetches the best bid and ask for a symbol.
    pub async fn get_quote(&self, symbol: &str) -> Result<TopOfBook> {
        #[derive(Deserialize)]
        struct QuoteResponse {
            quote: TopOfBook,
        }

        let url = self.endpoint_url(symbol, "quote")?;
        let body = self.get(url).await?;
        let resp: QuoteResponse = serde_json::from_slice(&body)?;
        Ok(resp.quote)
    }
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| QuoteError::InvalidHeader(name.to_string()))
}

#[async_trait]
impl QuoteSource for Client {
    async fn book(&self, symbol: &str) -> Result<Option<BookSnapshot>> {
        self.get_book(symbol).await
    }

    async fn quote(&self, symbol: &str) -> Result<TopOfBook> {
        self.get_quote(symbol).await
    }
}
