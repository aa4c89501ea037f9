pub mod cli;
pub mod settings;
pub mod toml_config;

pub use settings::ProbeSettings;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

/// 三個探測工具共用的命令列參數
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(about = "Exploration probes for rustdoc's stringdex search index")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding root.js and the crate shard files
    #[arg(long)]
    pub index_dir: Option<String>,

    /// Crate shard file name inside the index directory
    #[arg(long)]
    pub shard: Option<String>,

    /// Directory for the structure dump and saved reports
    #[arg(long)]
    pub output_path: Option<String>,

    /// Bytes shown in hex and ASCII previews
    #[arg(long)]
    pub preview_bytes: Option<usize>,

    /// Bytes scanned for printable runs
    #[arg(long)]
    pub scan_window: Option<usize>,

    /// Maximum items listed per section
    #[arg(long)]
    pub list_limit: Option<usize>,

    /// Report format: text or json
    #[arg(long)]
    pub report_format: Option<String>,

    /// Also write the report next to the other outputs
    #[arg(long)]
    pub save_report: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 預設值 < TOML 檔案 < 命令列
    pub fn resolve(&self) -> Result<ProbeSettings> {
        let mut settings = ProbeSettings::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            toml_config::TomlConfig::from_file(path)?.apply_to(&mut settings)?;
        }

        if let Some(dir) = &self.index_dir {
            settings.index_dir = dir.clone();
        }
        if let Some(shard) = &self.shard {
            settings.shard = Some(shard.clone());
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }
        if let Some(n) = self.preview_bytes {
            settings.preview_bytes = n;
        }
        if let Some(n) = self.scan_window {
            settings.scan_window = n;
        }
        if let Some(n) = self.list_limit {
            settings.list_limit = n;
        }
        if let Some(format) = &self.report_format {
            settings.report_format = format.parse()?;
        }
        if self.save_report {
            settings.save_report = true;
        }

        Ok(settings)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::ports::ReportFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "stringdex-probe",
            "--index-dir",
            "docs/search.index",
            "--list-limit",
            "3",
            "--report-format",
            "json",
            "-v",
        ]);

        let settings = cli.resolve().unwrap();
        assert!(cli.verbose);
        assert_eq!(settings.index_dir, "docs/search.index");
        assert_eq!(settings.list_limit, 3);
        assert_eq!(settings.report_format, ReportFormat::Json);
        assert_eq!(settings.preview_bytes, 100);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[index]\ndir = \"from-toml\"\n\n[limits]\nlist_limit = 9\n")
            .unwrap();

        let cli = CliConfig {
            config: Some(temp_file.path().to_string_lossy().into_owned()),
            list_limit: Some(4),
            ..CliConfig::default()
        };

        let settings = cli.resolve().unwrap();
        assert_eq!(settings.index_dir, "from-toml");
        assert_eq!(settings.list_limit, 4);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliConfig {
            config: Some("/definitely/not/here.toml".to_string()),
            ..CliConfig::default()
        };
        assert!(cli.resolve().is_err());
    }
}
