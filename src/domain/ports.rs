use crate::domain::model::{ExtractResult, OutputDocument, Source};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn seed_file(&self) -> &str;
    fn sources_file(&self) -> &str;
    fn output_file(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn timeout_secs(&self) -> u64;
    fn user_agent(&self) -> &str;
}

/// 取得單一來源的原始 feed 內容
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: &Source) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<OutputDocument>;
    async fn load(&self, document: OutputDocument) -> Result<String>;
}
