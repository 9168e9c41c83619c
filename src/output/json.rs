//! JSON output writer

use super::{CrawlResult, OutputResult, ResultWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the result as one pretty-printed JSON document
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultWriter for JsonWriter {
    fn write_result(&self, result: &CrawlResult) -> OutputResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, result)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(
            "Wrote {} page results to {}",
            result.len(),
            self.path.display()
        );
        Ok(())
    }
}
