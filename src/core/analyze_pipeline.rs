use crate::core::engine::{persist, read_snapshot};
use crate::core::heuristics::{ascii_preview, hex_preview, printable_runs};
use crate::core::shape::{describe_value, truncate_chars, type_name};
use crate::core::wrapper::decode_base64;
use crate::core::{
    Analysis, ConfigProvider, IndexSnapshot, Pipeline, ProbeOutput, Report, Section, Storage,
};
use crate::domain::model::{MEMBER_DATA, MEMBER_HASH, MEMBER_KEY, MEMBER_META};
use crate::utils::error::Result;
use serde_json::Value;

/// 推測為壓縮資料的頂層欄位
pub const COMPRESSED_FIELDS: [&str; 7] = [
    "normalizedName",
    "name",
    "path",
    "entry",
    "desc",
    "function",
    "type",
];

const SAMPLE_FIELDS: [&str; 3] = ["normalizedName", "name", "path"];
const PRIMARY_FIELD: &str = "normalizedName";

/// First look at a search index: what is in `root.js`, how big each
/// compressed member is, and what `normalizedName.I` looks like once
/// base64-decoded.
pub struct AnalyzePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> AnalyzePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn root_structure(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("ROOT STRUCTURE");

        for (key, value) in &snapshot.root {
            section.line(format!("Key: {}", key));
            match value {
                Value::Object(obj) => {
                    section.line("  Type: Object");
                    for (k, v) in obj {
                        section.line(format!("    - {}: {}", k, describe_value(v)));
                    }
                }
                Value::Array(arr) => {
                    section.line(format!("  Type: Array (length: {})", arr.len()));
                    if let Some(first) = arr.first() {
                        section.line(format!("    First element: {}", describe_value(first)));
                    }
                }
                Value::String(s) => {
                    section.line(format!("  Type: String (length: {})", s.chars().count()));
                    if s.chars().count() < 100 {
                        section.line(format!("    Value: {}", s));
                    } else {
                        section.line(format!("    Value: {}...", truncate_chars(s, 100)));
                    }
                }
                other => {
                    section.line(format!("  Type: {}", describe_value(other)));
                }
            }
            section.blank();
        }

        section
    }

    fn compressed_fields(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("ANALYZING COMPRESSED FIELDS");

        for name in COMPRESSED_FIELDS {
            let Some(value) = snapshot.root.get(name) else {
                continue;
            };

            section.line(format!("{} structure:", name));
            if let Value::Object(members) = value {
                for (key, member) in members {
                    match member {
                        Value::String(s) => {
                            let len = s.chars().count();
                            section.line(format!("  {}: string (length: {})", key, len));
                            if len < 100 {
                                section.line(format!("      Value: {}", s));
                            }
                        }
                        other => {
                            section.line(format!("  {}: {}", key, type_name(other)));
                        }
                    }
                }
            } else {
                section.line(format!("  not an object ({})", type_name(value)));
            }
            section.blank();
        }

        section
    }

    fn decoding_attempt(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("DECODING ATTEMPT");

        let Some(data) = snapshot.field(PRIMARY_FIELD).and_then(|f| f.text(MEMBER_DATA)) else {
            section.line(format!("{}.{} not present", PRIMARY_FIELD, MEMBER_DATA));
            return section;
        };

        section.line(format!("{}.{} (first 200 chars):", PRIMARY_FIELD, MEMBER_DATA));
        section.line(truncate_chars(data, 200));
        section.blank();

        let decoded = match decode_base64(data) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("{}.{} is not base64: {}", PRIMARY_FIELD, MEMBER_DATA, e);
                section.line(format!("Base64 decode failed: {}", e));
                return section;
            }
        };

        let preview = self.config.preview_bytes();
        section.line(format!(
            "Base64 decode successful! Length: {} bytes",
            decoded.len()
        ));
        section.line(format!("First {} bytes as hex:", preview));
        section.line(hex_preview(&decoded, preview));
        section.blank();
        section.line(format!("First {} bytes as ASCII (. for non-printable):", preview));
        section.line(ascii_preview(&decoded, preview));
        section.blank();

        let window = self.config.scan_window();
        section.line(format!(
            "Looking for printable strings in the first {} bytes...",
            window
        ));
        let runs = printable_runs(&decoded, window);
        if runs.is_empty() {
            section.line("No printable strings found");
        } else {
            section.line(format!("Found {} potential strings:", runs.len()));
            for run in runs.iter().take(self.config.list_limit()) {
                section.line(format!("  - {}", run));
            }
        }

        section
    }

    fn key_fields(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("N, E, H FIELDS");

        let Some(field) = snapshot.field(PRIMARY_FIELD) else {
            section.line(format!("{} not present", PRIMARY_FIELD));
            return section;
        };

        if field.member(MEMBER_KEY).is_some() {
            section.line(format!("N field: {}", field.display(MEMBER_KEY)));
        }

        if let Some(meta) = field.text(MEMBER_META) {
            section.line(format!(
                "E field (length {}): {}",
                meta.chars().count(),
                truncate_chars(meta, 100)
            ));
            // E 無法解碼時直接略過
            if let Ok(bytes) = decode_base64(meta) {
                section.line(format!("  E decoded: {} bytes", bytes.len()));
                section.line(format!(
                    "  As integers: {:?}",
                    &bytes[..bytes.len().min(20)]
                ));
            }
        }

        if let Some(hash) = field.member(MEMBER_HASH) {
            let hash = match hash {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            section.line(format!("H field: {}", hash));
            section.line(format!("  Looks like a hash: {} chars", hash.chars().count()));
        }

        section
    }

    fn samples(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("SAMPLE DATA FROM DIFFERENT FIELDS");

        for name in SAMPLE_FIELDS {
            if let Some(data) = snapshot.field(name).and_then(|f| f.text(MEMBER_DATA)) {
                section.line(format!("{}.{} first 300 chars:", name, MEMBER_DATA));
                section.line(truncate_chars(data, 300));
                section.blank();
            }
        }

        section
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AnalyzePipeline<S, C> {
    async fn extract(&self) -> Result<IndexSnapshot> {
        read_snapshot(&self.storage, &self.config).await
    }

    async fn analyze(&self, snapshot: IndexSnapshot) -> Result<Analysis> {
        let mut report = Report::new("analyze_index", "SEARCH INDEX ANALYSIS");
        report.push(self.root_structure(&snapshot));
        report.push(self.compressed_fields(&snapshot));
        report.push(self.decoding_attempt(&snapshot));
        report.push(self.key_fields(&snapshot));
        report.push(self.samples(&snapshot));

        Ok(Analysis {
            report,
            artifacts: Vec::new(),
        })
    }

    async fn load(&self, analysis: Analysis) -> Result<ProbeOutput> {
        persist(&self.storage, &self.config, analysis).await
    }
}
