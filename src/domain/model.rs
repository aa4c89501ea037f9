use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// 壓縮欄位中的已知成員
pub const MEMBER_DATA: &str = "I";
pub const MEMBER_KEY: &str = "N";
pub const MEMBER_META: &str = "E";
pub const MEMBER_HASH: &str = "H";

/// A parsed `root.js`, plus the crate shard the structure probe looks at.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    pub root_path: String,
    pub root: Map<String, Value>,
    pub shard: Option<ShardFile>,
}

impl IndexSnapshot {
    pub fn new(root_path: String, root: Map<String, Value>) -> Self {
        Self {
            root_path,
            root,
            shard: None,
        }
    }

    /// Top-level members whose value is an object, e.g. `normalizedName`.
    pub fn field(&self, name: &str) -> Option<CompressedField<'_>> {
        match self.root.get(name) {
            Some(Value::Object(members)) => Some(CompressedField { members }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShardFile {
    pub file_name: String,
    pub preview: String,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct CompressedField<'a> {
    pub members: &'a Map<String, Value>,
}

impl<'a> CompressedField<'a> {
    pub fn member(&self, key: &str) -> Option<&'a Value> {
        self.members.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&'a str> {
        self.members.get(key).and_then(Value::as_str)
    }

    /// Members are usually short strings but are printed whatever their type.
    pub fn display(&self, key: &str) -> String {
        match self.member(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<absent>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        writeln!(f)?;
        for section in &self.sections {
            writeln!(f, "=== {} ===", section.heading)?;
            writeln!(f)?;
            for line in &section.lines {
                writeln!(f, "{}", line)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: Report,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone)]
pub struct ProbeOutput {
    pub report: Report,
    pub written: Vec<String>,
}
