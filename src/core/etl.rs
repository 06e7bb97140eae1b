use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct TableGenEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TableGenEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting table generation...");

        // Extract
        let parsed = self.pipeline.extract().await?;
        tracing::info!(
            "Parsed {} ({}, epoch {}) with {} coefficient rows",
            parsed.title,
            parsed.date,
            parsed.epoch,
            parsed.rows.len()
        );

        // Transform
        let result = self.pipeline.transform(parsed).await?;
        tracing::info!(
            "Normalized and indexed {} coefficients up to degree {}",
            result.model.len(),
            result.model.nm_max()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Table written to: {}", output_path);

        Ok(output_path)
    }
}
