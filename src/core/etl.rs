use crate::core::Pipeline;
use crate::domain::model::{BulkRow, ErrorEntry};
use crate::utils::error::Result;

/// What a finished run produced: where it was written, plus the full
/// (uncapped) bulk rows and row issues for display.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub rows: Vec<BulkRow>,
    pub errors: Vec<ErrorEntry>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting bulk sheet generation");

        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} keyword rows and {} ad rows",
            extracted.keywords.len(),
            extracted.ads.len()
        );

        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!(
            "Generated {} bulk rows with {} row issues",
            transformed.rows.len(),
            transformed.errors.len()
        );

        let rows = transformed.rows.clone();
        let errors = transformed.errors.clone();

        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            rows,
            errors,
        })
    }
}
