use crate::core::{ConfigProvider, ReportFormat, Storage};
use crate::utils::error::{ProbeError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.files
            .lock()
            .await
            .insert(path.to_string(), data.to_vec());
        self
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            ProbeError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", dir);
        let files = self.files.lock().await;
        let mut names: Vec<String> = files
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }
}

pub struct MockConfig {
    pub index_dir: String,
    pub shard: Option<String>,
    pub output_path: String,
    pub preview_bytes: usize,
    pub scan_window: usize,
    pub list_limit: usize,
    pub report_format: ReportFormat,
    pub save_report: bool,
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            index_dir: "idx".to_string(),
            shard: None,
            output_path: "out".to_string(),
            preview_bytes: 100,
            scan_window: 500,
            list_limit: 20,
            report_format: ReportFormat::Text,
            save_report: false,
        }
    }
}

impl ConfigProvider for MockConfig {
    fn index_dir(&self) -> &str {
        &self.index_dir
    }

    fn shard(&self) -> Option<&str> {
        self.shard.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn preview_bytes(&self) -> usize {
        self.preview_bytes
    }

    fn scan_window(&self) -> usize {
        self.scan_window
    }

    fn list_limit(&self) -> usize {
        self.list_limit
    }

    fn report_format(&self) -> ReportFormat {
        self.report_format
    }

    fn save_report(&self) -> bool {
        self.save_report
    }
}

/// 以 `rr_('...')` 包裝 JSON，模擬 rustdoc 產生的 root.js
pub fn root_js(json: &serde_json::Value) -> Vec<u8> {
    format!("rr_('{}')", json).into_bytes()
}
