use crate::domain::model::{Analysis, IndexSnapshot, ProbeOutput};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 目錄下的檔名（不含子目錄）
    fn list_files(&self, dir: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn index_dir(&self) -> &str;
    fn shard(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn preview_bytes(&self) -> usize;
    fn scan_window(&self) -> usize;
    fn list_limit(&self) -> usize;
    fn report_format(&self) -> ReportFormat;
    fn save_report(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<IndexSnapshot>;
    async fn analyze(&self, snapshot: IndexSnapshot) -> Result<Analysis>;
    async fn load(&self, analysis: Analysis) -> Result<ProbeOutput>;
}
