use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let name = self.pipeline.name();
        tracing::info!("Starting {} reduction...", name);

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("[{}] Extracted {} records", name, raw_data.len());

        // Transform
        let transformed_result = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "[{}] Transformed {} records",
            name,
            transformed_result.processed_records.len()
        );

        // Load
        let output_path = self.pipeline.load(transformed_result).await?;
        tracing::info!("[{}] Output saved to: {}", name, output_path);

        Ok(output_path)
    }
}
