use super::{RecordQuery, RecordSource};
use crate::error::{CostError, Result};
use crate::types::UsageRecord;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs as async_fs;

/// Reads `<dir>/<conversation_id>.jsonl`, one usage record per line
#[derive(Debug, Clone)]
pub struct JsonlRecordSource {
    dir: PathBuf,
}

impl JsonlRecordSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the conversation's ledger file, or `None` when the ID would
    /// resolve outside `dir`
    fn conversation_path(&self, query: &RecordQuery) -> Option<PathBuf> {
        let file_name = format!("{}.jsonl", query.conversation_id.as_str());
        let mut components = Path::new(&file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == file_name.as_str() => {
                Some(self.dir.join(name))
            }
            _ => None,
        }
    }
}

/// Parse JSONL contents, skipping blank and unparsable lines
fn parse_records(contents: &str, query: &RecordQuery) -> Vec<UsageRecord> {
    let mut records: Vec<UsageRecord> = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str::<UsageRecord>(line) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::debug!(
                    conversation = %query.conversation_id,
                    line = index + 1,
                    error = %err,
                    "skipping unparsable usage record"
                );
                None
            }
        })
        .filter(|record| query.admits(record))
        .collect();

    // Stable; records without timestamps go last in file order
    records.sort_by_key(|record| (record.timestamp.is_none(), record.timestamp));
    records
}

#[async_trait]
impl RecordSource for JsonlRecordSource {
    async fn fetch_usage_records(&self, query: &RecordQuery) -> Result<Vec<UsageRecord>> {
        let Some(path) = self.conversation_path(query) else {
            return Err(CostError::RecordSource {
                conversation_id: query.conversation_id.to_string(),
                message: "conversation ID is not a plain file name".to_string(),
            });
        };
        let contents = match async_fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(CostError::FileRead { path, source }),
        };

        Ok(parse_records(&contents, query))
    }
}
