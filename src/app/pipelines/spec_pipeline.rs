use crate::core::aggregator::{aggregate, generation_timestamp};
use crate::domain::model::{CatalogEntry, ExtractResult, OutputDocument, Source, SourceFeed};
use crate::domain::ports::{ConfigProvider, FeedFetcher, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use std::path::Path;

/// 種子目錄 + 來源清單 -> 抓取 feed -> 比對 -> 寫出 specs.json
pub struct SpecPipeline<S: Storage, C: ConfigProvider, F: FeedFetcher> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) fetcher: F,
}

impl<S: Storage, C: ConfigProvider, F: FeedFetcher> SpecPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }

    fn display_path(&self, file: &str) -> String {
        Path::new(self.config.data_dir())
            .join(file)
            .display()
            .to_string()
    }

    /// 讀不到或解析失敗都是致命錯誤
    async fn load_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let input_error = |reason: String| EtlError::InputLoadError {
            path: self.display_path(file),
            reason,
        };

        let bytes = self
            .storage
            .read_file(file)
            .await
            .map_err(|e| input_error(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| input_error(e.to_string()))
    }

    pub async fn load_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let catalog: Vec<CatalogEntry> = self.load_json(self.config.seed_file()).await?;

        if let Some(position) = catalog.iter().position(|e| e.model.trim().is_empty()) {
            return Err(EtlError::ValidationError {
                message: format!(
                    "{}: entry #{} has an empty model name",
                    self.display_path(self.config.seed_file()),
                    position
                ),
            });
        }

        tracing::info!("📂 Loaded {} catalog entries", catalog.len());
        Ok(catalog)
    }

    pub async fn load_sources(&self) -> Result<Vec<Source>> {
        let sources: Vec<Source> = self.load_json(self.config.sources_file()).await?;
        tracing::info!("📂 Loaded {} sources", sources.len());
        Ok(sources)
    }

    /// 抓取所有來源；失敗的來源只記錄警告並略過。結果依來源清單順序回傳。
    pub async fn fetch_feeds(&self, sources: &[Source]) -> Vec<SourceFeed> {
        let fetcher = &self.fetcher;
        let results: Vec<(Source, Result<String>)> = stream::iter(sources.iter().cloned())
            .map(|source| async move {
                let result = fetcher.fetch(&source).await;
                (source, result)
            })
            .buffered(self.config.concurrent_requests().max(1))
            .collect()
            .await;

        let mut feeds = Vec::with_capacity(results.len());
        for (source, result) in results {
            match result {
                Ok(body) => {
                    tracing::debug!("📡 {}: fetched {} bytes", source.name, body.len());
                    feeds.push(SourceFeed { source, body });
                }
                Err(EtlError::HttpStatusError { status, .. }) => {
                    tracing::warn!(
                        source = %source.name,
                        status,
                        "⚠️ Failed to fetch {}: {}",
                        source.name,
                        status
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source.name,
                        error = %e,
                        "⚠️ Failed to fetch {}",
                        source.name
                    );
                }
            }
        }

        tracing::info!(
            "📡 Fetched {}/{} sources successfully",
            feeds.len(),
            sources.len()
        );
        feeds
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: FeedFetcher> Pipeline for SpecPipeline<S, C, F> {
    async fn extract(&self) -> Result<ExtractResult> {
        let sources = self.load_sources().await?;
        let catalog = self.load_catalog().await?;
        let feeds = self.fetch_feeds(&sources).await;

        Ok(ExtractResult {
            catalog,
            sources,
            feeds,
        })
    }

    async fn transform(&self, data: ExtractResult) -> Result<OutputDocument> {
        let document = aggregate(
            data.catalog,
            &data.sources,
            &data.feeds,
            generation_timestamp(),
        );

        let with_articles = document
            .models
            .iter()
            .filter(|m| !m.sources.is_empty())
            .count();
        tracing::debug!(
            "{} of {} models have matching articles",
            with_articles,
            document.models.len()
        );

        Ok(document)
    }

    async fn load(&self, document: OutputDocument) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');

        let output_file = self.config.output_file();
        self.storage.write_file(output_file, json.as_bytes()).await?;

        let output_path = self.display_path(output_file);
        tracing::info!(
            "Updated {} with {} models.",
            output_path,
            document.models.len()
        );
        Ok(output_path)
    }
}
