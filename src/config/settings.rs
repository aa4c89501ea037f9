use crate::core::ConfigProvider;
use crate::domain::ports::ReportFormat;
use crate::utils::error::{ProbeError, Result};
use crate::utils::validation::{self, Validate};
use std::str::FromStr;

pub const DEFAULT_INDEX_DIR: &str = "target/doc/search.index";
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_PREVIEW_BYTES: usize = 100;
pub const DEFAULT_SCAN_WINDOW: usize = 500;
pub const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 10_000;

impl FromStr for ReportFormat {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ProbeError::InvalidConfigValueError {
                field: "output.report_format".to_string(),
                value: s.to_string(),
                reason: "Unsupported format. Valid formats: text, json".to_string(),
            }),
        }
    }
}

/// 合併預設值、TOML 檔案與命令列後的最終設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub index_dir: String,
    pub shard: Option<String>,
    pub output_path: String,
    pub preview_bytes: usize,
    pub scan_window: usize,
    pub list_limit: usize,
    pub report_format: ReportFormat,
    pub save_report: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            index_dir: DEFAULT_INDEX_DIR.to_string(),
            shard: None,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            preview_bytes: DEFAULT_PREVIEW_BYTES,
            scan_window: DEFAULT_SCAN_WINDOW,
            list_limit: DEFAULT_LIST_LIMIT,
            report_format: ReportFormat::Text,
            save_report: false,
        }
    }
}

impl ConfigProvider for ProbeSettings {
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

impl Validate for ProbeSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("index.dir", &self.index_dir)?;
        validation::validate_path("output.path", &self.output_path)?;

        if let Some(shard) = &self.shard {
            validation::validate_file_name("index.shard", shard)?;
        }

        validation::validate_positive_number("limits.preview_bytes", self.preview_bytes, 1)?;
        validation::validate_positive_number("limits.scan_window", self.scan_window, 1)?;
        validation::validate_range("limits.list_limit", self.list_limit, 1, MAX_LIST_LIMIT)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ProbeSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.index_dir(), "target/doc/search.index");
        assert_eq!(settings.report_format(), ReportFormat::Text);
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(" TEXT ".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("yaml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let settings = ProbeSettings {
            list_limit: 0,
            ..ProbeSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = ProbeSettings {
            scan_window: 0,
            ..ProbeSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_shard_must_be_file_name() {
        let settings = ProbeSettings {
            shard: Some("sub/2b422b797b01.js".to_string()),
            ..ProbeSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
