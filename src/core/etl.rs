use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 完整重算一次並整份取代輸出，回傳輸出路徑
    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting spec refresh");

        // Extract
        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} catalog entries, {}/{} feeds",
            extracted.catalog.len(),
            extracted.feeds.len(),
            extracted.sources.len()
        );

        // Transform
        let document = self.pipeline.transform(extracted).await?;
        let matched: usize = document.models.iter().map(|m| m.sources.len()).sum();
        tracing::info!(
            "Matched {} articles across {} models",
            matched,
            document.models.len()
        );

        // Load
        let output_path = self.pipeline.load(document).await?;
        tracing::info!("⏱️ Finished in {:?}", started.elapsed());

        Ok(output_path)
    }
}
