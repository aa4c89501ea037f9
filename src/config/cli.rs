use crate::core::{ProbeOutput, ReportFormat, Storage};
use crate::utils::error::{ProbeError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let full_path = Path::new(&self.base_path).join(dir);
        let mut entries = tokio::fs::read_dir(full_path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }
}

/// 輸出報告並回傳程序退出碼
pub fn report_outcome(result: Result<ProbeOutput>, format: ReportFormat) -> i32 {
    match result.and_then(|output| print_output(&output, format)) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(
                "❌ Probe failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            e.exit_code()
        }
    }
}

fn print_output(output: &ProbeOutput, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => print!("{}", output.report),
        ReportFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output.report).map_err(ProbeError::from)?
        ),
    }

    for path in &output.written {
        tracing::info!("📁 Saved: {}", path);
    }
    Ok(())
}
