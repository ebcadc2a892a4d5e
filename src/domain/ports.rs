use crate::domain::model::{ExtractedData, TransformResult};
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
    fn keywords_path(&self) -> &str;
    fn ads_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Empty or absent means no prefix check.
    fn campaign_prefix(&self) -> Option<&str>;
    fn bundle_output(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractedData>;
    async fn transform(&self, data: ExtractedData) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
