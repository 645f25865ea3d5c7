use crate::domain::model::Source;
use crate::domain::ports::FeedFetcher;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;

/// 以 reqwest 抓取 feed，每個來源只嘗試一次
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, source: &Source) -> Result<String> {
        tracing::debug!("Fetching {} from {}", source.name, source.url);
        let response = self
            .client
            .get(&source.url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} responded with {}", source.name, status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                source_name: source.name.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
