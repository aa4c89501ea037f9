use crate::core::engine::{persist, read_snapshot};
use crate::core::heuristics::{extract_utf16_strings, offset_table, read_varint};
use crate::core::wrapper::decode_base64;
use crate::core::{
    Analysis, CompressedField, ConfigProvider, IndexSnapshot, Pipeline, ProbeOutput, Report,
    Section, Storage,
};
use crate::domain::model::{MEMBER_DATA, MEMBER_HASH, MEMBER_KEY, MEMBER_META};
use crate::utils::error::Result;

const E_PREVIEW: usize = 20;

const FORMAT_NOTES: [&str; 11] = [
    "Each field (normalizedName, name, path, ...) is an object with:",
    "  I: base64 binary data holding the strings themselves",
    "  N: a short reference key (crate or section?)",
    "  E: base64 metadata, probably indices, offsets or lengths",
    "  H: a hash, probably for integrity checking",
    "",
    "Working hypothesis for building a search index:",
    "  1. base64-decode I and pull out NUL-terminated UTF-16LE strings",
    "  2. use E to map items to their string positions",
    "  3. use N to tell crates/sections apart",
    "  4. cross-reference name, path, entry and desc by index",
];

/// Tries to read the string pools as NUL-terminated UTF-16LE and the `E`
/// members as 16-bit offset tables.
pub struct DecodePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DecodePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// `I` 解碼後以 UTF-16LE 列出字串
    fn string_pool(&self, section: &mut Section, field: CompressedField<'_>, label: &str) {
        let Some(data) = field.text(MEMBER_DATA) else {
            section.line("I field not present");
            return;
        };

        section.line(format!("Compressed size: {} chars", data.chars().count()));
        let decoded = match decode_base64(data) {
            Ok(bytes) => bytes,
            Err(e) => {
                section.line(format!("I field could not be decoded: {}", e));
                return;
            }
        };
        section.line(format!("Decoded size: {} bytes", decoded.len()));

        let (leading, next) = read_varint(&decoded, 0);
        section.line(format!("Leading varint: {} ({} bytes)", leading, next));
        section.blank();

        let strings = extract_utf16_strings(&decoded);
        let limit = self.config.list_limit();
        section.line(format!("Extracted {} {}:", strings.len(), label));
        for (i, s) in strings.iter().take(limit).enumerate() {
            section.line(format!("  {:3}. {}", i, s));
        }
        if strings.len() > limit {
            section.line(format!("  ... and {} more", strings.len() - limit));
        }
    }

    fn offsets(&self, section: &mut Section, field: CompressedField<'_>, label: &str) {
        match field.text(MEMBER_META).map(decode_base64) {
            Some(Ok(bytes)) => {
                let values = offset_table(&bytes);
                section.line(format!(
                    "{} (first {} values): {:?}",
                    label,
                    E_PREVIEW,
                    &values[..values.len().min(E_PREVIEW)]
                ));
            }
            Some(Err(e)) => {
                section.line(format!("E field could not be decoded: {}", e));
            }
            None => {
                section.line("E field not present");
            }
        }
    }

    fn normalized_names(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("1. NORMALIZED NAMES");
        let Some(field) = snapshot.field("normalizedName") else {
            section.line("normalizedName field not present");
            return section;
        };

        section.line(format!("N field: {}", field.display(MEMBER_KEY)));
        section.line(format!("H field (hash): {}", field.display(MEMBER_HASH)));
        self.string_pool(&mut section, field, "normalized names");
        section
    }

    fn regular_names(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("2. REGULAR NAMES");
        let Some(field) = snapshot.field("name") else {
            section.line("name field not present");
            return section;
        };

        section.line(format!("N field: {}", field.display(MEMBER_KEY)));
        section.line(format!("H field (hash): {}", field.display(MEMBER_HASH)));

        let shared = snapshot
            .field("normalizedName")
            .map(|n| n.member(MEMBER_KEY) == field.member(MEMBER_KEY))
            .unwrap_or(false);
        if shared {
            section.line("(N field matches normalizedName, likely references the same string pool)");
        }
        section
    }

    fn paths(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("3. PATHS");
        let Some(field) = snapshot.field("path") else {
            section.line("path field not present");
            return section;
        };

        section.line(format!("N field: {}", field.display(MEMBER_KEY)));
        self.string_pool(&mut section, field, "paths");
        section
    }

    fn offset_field(&self, snapshot: &IndexSnapshot, heading: &str, name: &str) -> Section {
        let mut section = Section::new(heading);
        let Some(field) = snapshot.field(name) else {
            section.line(format!("{} field not present", name));
            return section;
        };

        section.line(format!("N field: {}", field.display(MEMBER_KEY)));
        self.offsets(&mut section, field, "E field decoded");
        section
    }

    fn types(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("6. TYPES");
        match snapshot.field("type") {
            Some(field) => {
                section.line(format!("N field: {}", field.display(MEMBER_KEY)));
                section.line("Type field contains type signatures for functions");
            }
            None => {
                section.line("type field not present");
            }
        }
        section
    }

    fn searchable_items(&self, snapshot: &IndexSnapshot) -> Section {
        let mut section = Section::new("EXTRACTING SEARCHABLE ITEMS");
        let Some(field) = snapshot.field("crateNames") else {
            section.line("crateNames field not present");
            return section;
        };

        section.line("Crate names:");
        section.line(format!("  N: {}", field.display(MEMBER_KEY)));
        match field.text(MEMBER_META).map(decode_base64) {
            Some(Ok(bytes)) => {
                section.line(format!("  E field: {:?}", offset_table(&bytes)));
            }
            Some(Err(e)) => {
                section.line(format!("  E field could not be decoded: {}", e));
            }
            None => {
                section.line("  E field not present");
            }
        }
        section
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DecodePipeline<S, C> {
    async fn extract(&self) -> Result<IndexSnapshot> {
        read_snapshot(&self.storage, &self.config).await
    }

    async fn analyze(&self, snapshot: IndexSnapshot) -> Result<Analysis> {
        let mut report = Report::new("decode_stringdex", "RUSTDOC SEARCH INDEX ANALYSIS");
        report.push(self.normalized_names(&snapshot));
        report.push(self.regular_names(&snapshot));
        report.push(self.paths(&snapshot));
        report.push(self.offset_field(&snapshot, "4. ENTRY POINTS", "entry"));
        report.push(self.offset_field(&snapshot, "5. DESCRIPTIONS", "desc"));
        report.push(self.types(&snapshot));

        let mut notes = Section::new("UNDERSTANDING THE FORMAT");
        for line in FORMAT_NOTES {
            notes.line(line);
        }
        report.push(notes);
        report.push(self.searchable_items(&snapshot));

        Ok(Analysis {
            report,
            artifacts: Vec::new(),
        })
    }

    async fn load(&self, analysis: Analysis) -> Result<ProbeOutput> {
        persist(&self.storage, &self.config, analysis).await
    }
}
