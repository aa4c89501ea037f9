use crate::core::engine::{join_path, persist, read_snapshot};
use crate::core::heuristics::{hex_preview, le_u16_words};
use crate::core::shape::truncate_chars;
use crate::core::wrapper::{decode_base64, extract_shard_payload, ROOT_FILE};
use crate::core::{
    Analysis, Artifact, ConfigProvider, IndexSnapshot, Pipeline, ProbeOutput, Report, Section,
    ShardFile, Storage,
};
use crate::domain::model::{MEMBER_KEY, MEMBER_META};
use crate::utils::error::Result;

pub const DUMP_FILE: &str = "search_index_structure.json";
const SHARD_PREVIEW_CHARS: usize = 500;

const STRATEGY: [&str; 8] = [
    "Fields like normalizedName, name and path hold compressed data in I/N/E/H members.",
    "N looks like a short key into a string pool; I holds the string data; E holds indices/offsets.",
    "",
    "Next steps:",
    "  1. work out the stringdex compression itself",
    "  2. read how rustdoc's search.js decodes these members",
    "  3. or read the rustdoc code that generates them",
    "root.js acts as a registry pointing at per-crate shard files, each with its own data.",
];

/// Dumps the parsed `root.js` to disk and looks at one per-crate shard.
pub struct StructurePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> StructurePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// 指定的 shard 優先，否則取目錄中第一個非 root.js 的 .js 檔
    async fn locate_shard(&self) -> Result<Option<String>> {
        if let Some(shard) = self.config.shard() {
            return Ok(Some(shard.to_string()));
        }

        let names = self.storage.list_files(self.config.index_dir()).await?;
        Ok(names
            .into_iter()
            .find(|name| name.ends_with(".js") && name != ROOT_FILE))
    }

    async fn read_shard(&self, file_name: String) -> Result<ShardFile> {
        let path = join_path(self.config.index_dir(), &file_name);
        tracing::debug!("Reading shard {}", path);

        let bytes = self.storage.read_file(&path).await?;
        let content = String::from_utf8_lossy(&bytes);

        Ok(ShardFile {
            preview: truncate_chars(&content, SHARD_PREVIEW_CHARS).to_string(),
            payload: extract_shard_payload(&content)?,
            file_name,
        })
    }

    fn structure(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("SEARCH INDEX STRUCTURE");
        section.line(format!(
            "Saved full structure to: {}",
            join_path(self.config.output_path(), DUMP_FILE)
        ));
        section.blank();
        section.line("Top-level keys:");
        for key in snapshot.root.keys() {
            section.line(format!("  - {}", key));
        }
        section
    }

    fn observations(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("KEY OBSERVATIONS");

        let Some(shard) = &snapshot.shard else {
            section.line(format!(
                "No crate shard files found in {}",
                self.config.index_dir()
            ));
            return section;
        };

        section.line(format!("Sample crate index file ({}):", shard.file_name));
        section.line(shard.preview.as_str());
        section.blank();

        let Some(payload) = &shard.payload else {
            section.line("No rn_(\"...\") payload found");
            return section;
        };

        section.line("Simple file contains base64 data:");
        section.line(payload.as_str());
        section.blank();

        match decode_base64(payload) {
            Ok(decoded) => {
                let preview = self.config.preview_bytes();
                section.line(format!("Decoded length: {} bytes", decoded.len()));
                section.line(format!("Hex dump (first {} bytes):", preview));
                section.line(hex_preview(&decoded, preview));
            }
            Err(e) => {
                section.line(format!("Base64 decode failed: {}", e));
            }
        }
        section
    }

    fn meta_field(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("normalizedName.E FIELD");

        let Some(field) = snapshot.field("normalizedName") else {
            section.line("normalizedName not present");
            return section;
        };

        match field.text(MEMBER_META).map(decode_base64) {
            Some(Ok(bytes)) => {
                section.line(format!("  Length: {} bytes", bytes.len()));
                section.line(format!("  Hex: {}", hex_preview(&bytes, bytes.len())));
                section.line(format!("  As 16-bit ints: {:?}", le_u16_words(&bytes)));
            }
            Some(Err(e)) => {
                section.line(format!("  E field could not be decoded: {}", e));
            }
            None => {
                section.line("  E field not present");
            }
        }

        section.blank();
        section.line(format!(
            "normalizedName.N field: {}",
            field.display(MEMBER_KEY)
        ));
        section
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for StructurePipeline<S, C> {
    async fn extract(&self) -> Result<IndexSnapshot> {
        let mut snapshot = read_snapshot(&self.storage, &self.config).await?;

        match self.locate_shard().await? {
            Some(file_name) => {
                snapshot.shard = Some(self.read_shard(file_name).await?);
            }
            None => {
                tracing::warn!("⚠️ No crate shard files in {}", self.config.index_dir());
            }
        }

        Ok(snapshot)
    }

    async fn analyze(&self, snapshot: IndexSnapshot) -> Result<Analysis> {
        let dump = serde_json::to_vec_pretty(&snapshot.root)?;

        let mut report = Report::new("index_structure", "SEARCH INDEX STRUCTURE DUMP");
        report.push(self.structure(&snapshot));
        report.push(self.observations(&snapshot));

        let mut decoder = Section::new("LOOKING FOR STRINGDEX DECODER");
        decoder.line("The format appears to be called 'stringdex'; rustdoc's source is the reference.");
        report.push(decoder);

        report.push(self.meta_field(&snapshot));

        let mut strategy = Section::new("STRATEGY");
        for line in STRATEGY {
            strategy.line(line);
        }
        report.push(strategy);

        Ok(Analysis {
            report,
            artifacts: vec![Artifact {
                file_name: DUMP_FILE.to_string(),
                contents: dump,
            }],
        })
    }

    async fn load(&self, analysis: Analysis) -> Result<ProbeOutput> {
        persist(&self.storage, &self.config, analysis).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{root_js, MockConfig, MockStorage};
    use crate::utils::error::ProbeError;
    use serde_json::{json, Value};

    fn sample_root() -> Value {
        json!({
            "normalizedName": {"I": "AAAA", "N": "a", "E": "AAECAwQ="},
            "crateNames": {"N": "e"},
            "desc": {"N": "é"}
        })
    }

    async fn storage_with(shard: Option<(&str, &[u8])>) -> MockStorage {
        let storage = MockStorage::new()
            .with_file("idx/root.js", &root_js(&sample_root()))
            .await;
        match shard {
            Some((name, data)) => storage.with_file(&format!("idx/{}", name), data).await,
            None => storage,
        }
    }

    async fn run_all(storage: MockStorage, config: MockConfig) -> Result<ProbeOutput> {
        let pipeline = StructurePipeline::new(storage, config);
        let snapshot = pipeline.extract().await?;
        let analysis = pipeline.analyze(snapshot).await?;
        pipeline.load(analysis).await
    }

    #[tokio::test]
    async fn test_dump_is_pretty_and_keeps_order() {
        let storage = storage_with(None).await;
        let output = run_all(storage.clone(), MockConfig::new()).await.unwrap();

        assert_eq!(output.written, vec!["out/search_index_structure.json"]);
        let dump = storage
            .get_file("out/search_index_structure.json")
            .await
            .unwrap();
        let text = String::from_utf8(dump).unwrap();

        assert!(text.starts_with("{\n  \"normalizedName\": {\n    \"I\": \"AAAA\""));
        assert!(text.contains("\"N\": \"é\""));
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, sample_root());
    }

    #[tokio::test]
    async fn test_structure_lists_keys() {
        let output = run_all(storage_with(None).await, MockConfig::new())
            .await
            .unwrap();
        let lines = &output.report.section("SEARCH INDEX STRUCTURE").unwrap().lines;

        assert_eq!(
            lines[0],
            "Saved full structure to: out/search_index_structure.json"
        );
        assert_eq!(&lines[3..], &["  - normalizedName", "  - crateNames", "  - desc"]);
    }

    #[tokio::test]
    async fn test_shard_discovered_and_decoded() {
        let storage = storage_with(Some(("2b422b797b01.js", b"rn_(\"3q2+7w==\")"))).await;
        let output = run_all(storage, MockConfig::new()).await.unwrap();
        let lines = &output.report.section("KEY OBSERVATIONS").unwrap().lines;

        assert_eq!(lines[0], "Sample crate index file (2b422b797b01.js):");
        assert_eq!(lines[1], "rn_(\"3q2+7w==\")");
        assert!(lines.contains(&"3q2+7w==".to_string()));
        assert!(lines.contains(&"Decoded length: 4 bytes".to_string()));
        assert_eq!(lines.last().unwrap(), "de ad be ef");
    }

    #[tokio::test]
    async fn test_shard_without_payload() {
        let storage = storage_with(Some(("aaaa.js", b"var x = 1;"))).await;
        let output = run_all(storage, MockConfig::new()).await.unwrap();
        let lines = &output.report.section("KEY OBSERVATIONS").unwrap().lines;

        assert_eq!(lines.last().unwrap(), "No rn_(\"...\") payload found");
    }

    #[tokio::test]
    async fn test_no_shard_is_not_fatal() {
        let output = run_all(storage_with(None).await, MockConfig::new())
            .await
            .unwrap();
        let lines = &output.report.section("KEY OBSERVATIONS").unwrap().lines;

        assert_eq!(lines, &vec!["No crate shard files found in idx".to_string()]);
    }

    #[tokio::test]
    async fn test_configured_shard_must_exist() {
        let mut config = MockConfig::new();
        config.shard = Some("missing.js".to_string());

        let err = run_all(storage_with(None).await, config).await.unwrap_err();
        assert!(matches!(err, ProbeError::IoError(_)));
    }

    #[tokio::test]
    async fn test_meta_field_as_words() {
        let output = run_all(storage_with(None).await, MockConfig::new())
            .await
            .unwrap();
        let lines = &output.report.section("normalizedName.E FIELD").unwrap().lines;

        assert_eq!(lines[0], "  Length: 5 bytes");
        assert_eq!(lines[1], "  Hex: 00 01 02 03 04");
        assert_eq!(lines[2], "  As 16-bit ints: [256, 770, 4]");
        assert_eq!(lines[4], "normalizedName.N field: a");
    }

    #[tokio::test]
    async fn test_decoder_note_precedes_meta_field() {
        let output = run_all(storage_with(None).await, MockConfig::new())
            .await
            .unwrap();
        let headings: Vec<&str> = output
            .report
            .sections
            .iter()
            .map(|s| s.heading.as_str())
            .collect();

        assert_eq!(
            headings,
            vec![
                "SEARCH INDEX STRUCTURE",
                "KEY OBSERVATIONS",
                "LOOKING FOR STRINGDEX DECODER",
                "normalizedName.E FIELD",
                "STRATEGY",
            ]
        );
    }
}
