use super::config;
use super::gateway::OptionsProvider;
use super::models::{Expiration, RawChain, Ticker, YahooOptionResult, YahooOptionsResponse};
use crate::error::GatewayError;
use async_trait::async_trait;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{Client, header};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

// -----------------------------------------------
// CLIENT WRAPPER WITH SESSION STATE
// -----------------------------------------------
pub struct YahooClient {
    client: Client,
    cookie_url: String,
    query_base: String,
    crumb: Arc<RwLock<Option<String>>>,
}

impl YahooClient {
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_endpoints(config::YAHOO_COOKIE_URL, config::YAHOO_QUERY_BASE_URL)
    }

    /// Point the client at other hosts (mirrors, test servers)
    pub fn with_endpoints(cookie_url: &str, query_base: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client()?,
            cookie_url: cookie_url.to_string(),
            query_base: query_base.trim_end_matches('/').to_string(),
            crumb: Arc::new(RwLock::new(None)),
        })
    }

    /// Pick up the session cookie and crumb (only once per client)
    async fn crumb(&self) -> Result<String, GatewayError> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut slot = self.crumb.write().await;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie host answers 404 but still sets the session cookie
        let _ = self
            .client
            .get(&self.cookie_url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await?;
        tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;

        let res = self
            .client
            .get(config::yahoo_crumb_url(&self.query_base))
            .send()
            .await?;
        let status = res.status();
        let crumb = res.text().await?.trim().to_string();

        if !status.is_success() || crumb.is_empty() || crumb.starts_with('<') {
            return Err(GatewayError::MissingCrumb);
        }

        info!("Yahoo session warmed up");
        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    /// GET a JSON document; no retries
    async fn fetch_json(&self, url: &str) -> Result<String, GatewayError> {
        debug!(url, "GET");
        let res = self.client.get(url).send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                preview: preview(&text),
            });
        }

        let trimmed = text.trim();
        if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            return Err(GatewayError::NonJson(preview(&text)));
        }

        Ok(text)
    }

    async fn fetch_options(
        &self,
        ticker: &Ticker,
        date: Option<i64>,
    ) -> Result<YahooOptionResult, GatewayError> {
        let crumb = self.crumb().await?;
        let url = config::yahoo_options_url(&self.query_base, ticker.as_str(), &crumb, date);

        let text = self.fetch_json(&url).await?;
        let response: YahooOptionsResponse = serde_json::from_str(&text)?;

        if let Some(error) = response.option_chain.error.filter(|e| !e.is_null()) {
            return Err(GatewayError::Provider(describe_provider_error(&error)));
        }

        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NoResult(ticker.to_string()))
    }
}

#[async_trait]
impl OptionsProvider for YahooClient {
    async fn expirations(&self, ticker: &Ticker) -> Result<Vec<Expiration>, GatewayError> {
        let result = self.fetch_options(ticker, None).await?;

        Ok(result
            .expiration_dates
            .into_iter()
            .filter_map(Expiration::from_epoch)
            .collect())
    }

    async fn option_chain(
        &self,
        ticker: &Ticker,
        expiration: &Expiration,
    ) -> Result<RawChain, GatewayError> {
        let result = self.fetch_options(ticker, Some(expiration.to_epoch())).await?;

        Ok(result
            .options
            .into_iter()
            .next()
            .map(|block| RawChain {
                calls: block.calls,
                puts: block.puts,
            })
            .unwrap_or_default())
    }
}

fn preview(body: &str) -> String {
    body.chars().take(config::BODY_PREVIEW_CHARS).collect()
}

fn describe_provider_error(error: &serde_json::Value) -> String {
    error
        .get("description")
        .and_then(|d| d.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client, GatewayError> {
    let mut headers = header::HeaderMap::new();

    // Rotating Accept-Language headers
    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static(lang));
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Ok(Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_provider_error() {
        let err = serde_json::json!({"code": "Not Found", "description": "No data found"});
        assert_eq!(describe_provider_error(&err), "No data found");

        let err = serde_json::json!("plain");
        assert_eq!(describe_provider_error(&err), "\"plain\"");
    }

    #[test]
    fn test_preview_truncates() {
        let body = "x".repeat(500);
        assert_eq!(preview(&body).len(), config::BODY_PREVIEW_CHARS);
    }
}
