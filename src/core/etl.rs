use crate::core::Pipeline;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub output_path: String,
    pub records: usize,
    pub groups: usize,
    pub warnings: usize,
}

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting breed statistics run...");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} breed records", records.len());

        // Transform
        let tables = self.pipeline.transform(records).await?;
        let records = tables.breeds.len();
        let groups = tables.count_by_group.len();
        let warnings = tables.warning_count();
        tracing::info!(
            "🔄 Normalized {} breeds into {} groups ({} warnings)",
            records,
            groups,
            warnings
        );

        // Load
        let output_path = self.pipeline.load(tables).await?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            records,
            groups,
            warnings,
        })
    }
}
