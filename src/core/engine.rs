use crate::core::wrapper::{self, ROOT_FILE};
use crate::core::{
    Analysis, ConfigProvider, IndexSnapshot, Pipeline, ProbeOutput, ReportFormat, Storage,
};
use crate::utils::error::{ProbeError, Result};
use std::path::Path;

pub struct ProbeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ProbeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ProbeOutput> {
        tracing::info!("🚀 Starting probe");

        tracing::info!("Extracting index payload...");
        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Parsed {} with {} top-level keys",
            snapshot.root_path,
            snapshot.root.len()
        );

        tracing::info!("Analyzing...");
        let analysis = self.pipeline.analyze(snapshot).await?;
        tracing::info!(
            "Built {} report sections, {} artifacts",
            analysis.report.sections.len(),
            analysis.artifacts.len()
        );

        let output = self.pipeline.load(analysis).await?;
        tracing::info!("✅ Probe completed, {} files written", output.written.len());

        Ok(output)
    }
}

/// 讀取 `<index_dir>/root.js` 並解析其中的 JSON
pub async fn read_snapshot<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
) -> Result<IndexSnapshot> {
    let root_path = join_path(config.index_dir(), ROOT_FILE);
    tracing::debug!("Reading {}", root_path);

    let bytes = storage.read_file(&root_path).await?;
    let content = String::from_utf8(bytes).map_err(|e| ProbeError::FormatError {
        message: format!("{} is not valid UTF-8: {}", root_path, e),
    })?;

    let root = wrapper::parse_root(&content, &root_path)?;
    Ok(IndexSnapshot::new(root_path, root))
}

/// 把 artifacts（以及選擇性的報告）寫到 output_path 底下
pub async fn persist<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    analysis: Analysis,
) -> Result<ProbeOutput> {
    let mut written = Vec::new();

    for artifact in &analysis.artifacts {
        let path = join_path(config.output_path(), &artifact.file_name);
        tracing::debug!("Writing {} ({} bytes)", path, artifact.contents.len());
        storage.write_file(&path, &artifact.contents).await?;
        written.push(path);
    }

    if config.save_report() {
        let format = config.report_format();
        let file_name = format!("{}.{}", analysis.report.name, format.extension());
        let contents = match format {
            ReportFormat::Text => analysis.report.to_string().into_bytes(),
            ReportFormat::Json => serde_json::to_vec_pretty(&analysis.report)?,
        };
        let path = join_path(config.output_path(), &file_name);
        storage.write_file(&path, &contents).await?;
        written.push(path);
    }

    Ok(ProbeOutput {
        report: analysis.report,
        written,
    })
}

pub(crate) fn join_path(dir: &str, file_name: &str) -> String {
    Path::new(dir).join(file_name).to_string_lossy().into_owned()
}
