use crate::config::settings::ProbeSettings;
use crate::utils::error::{ProbeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    pub dir: Option<String>,
    pub shard: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub report_format: Option<String>,
    pub save_report: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub preview_bytes: Option<usize>,
    pub scan_window: Option<usize>,
    pub list_limit: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProbeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProbeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOC_DIR})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 將檔案中有設定的值覆蓋到 settings
    pub fn apply_to(&self, settings: &mut ProbeSettings) -> Result<()> {
        if let Some(dir) = &self.index.dir {
            settings.index_dir = dir.clone();
        }
        if let Some(shard) = &self.index.shard {
            settings.shard = Some(shard.clone());
        }
        if let Some(path) = &self.output.path {
            settings.output_path = path.clone();
        }
        if let Some(format) = &self.output.report_format {
            settings.report_format = format.parse()?;
        }
        if let Some(save) = self.output.save_report {
            settings.save_report = save;
        }
        if let Some(n) = self.limits.preview_bytes {
            settings.preview_bytes = n;
        }
        if let Some(n) = self.limits.scan_window {
            settings.scan_window = n;
        }
        if let Some(n) = self.limits.list_limit {
            settings.list_limit = n;
        }
        Ok(())
    }
}
