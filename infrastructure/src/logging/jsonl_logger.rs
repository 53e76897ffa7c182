//! JSONL writer for run events.
//!
//! One line per [`RunEvent`]: the payload's fields plus `type` and `timestamp`.
//! The file is opened for append so consecutive runs in one CI job share a
//! single artifact.

use consistency_application::ports::run_event_logger::{RunEvent, RunEventLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonlRunEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunEventLogger {
    /// Open `path` for append, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: RunEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl RunEventLogger for JsonlRunEventLogger {
    fn log(&self, event: RunEvent) {
        let Ok(line) = serde_json::to_string(&record(event)) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Runs can be killed mid-way; keep what was written
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlRunEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs/run.jsonl");
        let logger = JsonlRunEventLogger::open(&path).unwrap();

        logger.log(RunEvent::new(
            "tag_resolved",
            json!({"path": "merge_base", "tag": "devel-abc123"}),
        ));
        logger.log(RunEvent::new(
            "state_change",
            json!({"from": "idle", "to": "torn_down"}),
        ));
        drop(logger);

        let records = lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "tag_resolved");
        assert_eq!(records[0]["tag"], "devel-abc123");
        assert!(records[0]["timestamp"].is_string());
        assert_eq!(records[1]["to"], "torn_down");
    }

    #[test]
    fn test_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        for _ in 0..2 {
            let logger = JsonlRunEventLogger::open(&path).unwrap();
            logger.log(RunEvent::new("run_finished", json!({"passed": true})));
        }
        assert_eq!(lines(&path).len(), 2);
    }

    #[test]
    fn test_scalar_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = JsonlRunEventLogger::open(&path).unwrap();
        logger.log(RunEvent::new("note", json!("restarted")));
        drop(logger);

        let records = lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "restarted");
    }

    #[test]
    fn test_open_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        assert!(JsonlRunEventLogger::open(blocker.join("run.jsonl")).is_err());
    }
}
