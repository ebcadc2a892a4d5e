use crate::adapters::tabular::{parse_table, write_bulk_csv, write_error_report};
use crate::config::settings::Settings;
use crate::core::{ConfigProvider, ExtractedData, Pipeline, Storage, TransformResult};
use crate::domain::model::Record;
use crate::domain::services::build_bulk_sheet;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const OUTPUT_PREFIX: &str = "google_ads_bulk";

/// Keyword and ad sheets in, Editor bulk sheet out.
pub struct BulkPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    settings: Settings,
}

impl<S: Storage, C: ConfigProvider> BulkPipeline<S, C> {
    pub fn new(storage: S, config: C, settings: Settings) -> Self {
        Self {
            storage,
            config,
            settings,
        }
    }

    async fn read_table(&self, path: &str) -> Result<Vec<Record>> {
        let bytes = self.storage.read_file(path).await?;
        parse_table(path, &bytes)
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }

    fn bundle(&self, result: &TransformResult) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file("bulk.csv", SimpleFileOptions::default())?;
        zip.write_all(result.csv_output.as_bytes())?;

        zip.start_file("errors.csv", SimpleFileOptions::default())?;
        zip.write_all(result.error_report.as_bytes())?;

        zip.start_file("settings.json", SimpleFileOptions::default())?;
        zip.write_all(self.settings.to_pretty_json()?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BulkPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractedData> {
        tracing::debug!("Reading keywords from {}", self.config.keywords_path());
        let keywords = self.read_table(self.config.keywords_path()).await?;

        tracing::debug!("Reading ads from {}", self.config.ads_path());
        let ads = self.read_table(self.config.ads_path()).await?;

        Ok(ExtractedData { keywords, ads })
    }

    async fn transform(&self, data: ExtractedData) -> Result<TransformResult> {
        let prefix = self.config.campaign_prefix();
        tracing::debug!("Campaign prefix check: {:?}", prefix);

        let sheet = build_bulk_sheet(&data.keywords, &data.ads, &self.settings, prefix);
        let csv_output = write_bulk_csv(&sheet.rows)?;
        let error_report = write_error_report(&sheet.errors)?;

        Ok(TransformResult {
            rows: sheet.rows,
            errors: sheet.errors,
            csv_output,
            error_report,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let base_name = format!("{}_{}", OUTPUT_PREFIX, stamp);

        if result.rows.is_empty() {
            tracing::warn!("No bulk rows were generated; the sheet has only a header");
        }

        if self.config.bundle_output() {
            let zip_data = self.bundle(&result)?;
            let zip_path = self.output_file(&format!("{}.zip", base_name));
            tracing::debug!("Writing bundle ({} bytes)", zip_data.len());
            self.storage.write_file(&zip_path, &zip_data).await?;
            return Ok(zip_path);
        }

        let csv_path = self.output_file(&format!("{}.csv", base_name));
        self.storage
            .write_file(&csv_path, result.csv_output.as_bytes())
            .await?;

        if !result.errors.is_empty() {
            let errors_path = self.output_file(&format!("{}_errors.csv", base_name));
            self.storage
                .write_file(&errors_path, result.error_report.as_bytes())
                .await?;
            tracing::info!("Error report saved to: {}", errors_path);
        }

        Ok(csv_path)
    }
}
