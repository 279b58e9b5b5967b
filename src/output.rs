//! Line-delimited message output.
//!
//! Each message is one JSON object on its own line:
//!
//! ```text
//! {"type":"SCHEMA","stream":"campaigns","schema":{...},"key_properties":["id"]}
//! {"type":"RECORD","stream":"campaigns","record":{...}}
//! {"type":"STATE","value":{"campaigns_123":"2017-06-01T00:00:00Z"}}
//! ```

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use checkpoint::store::{CheckpointStore, StateSnapshot};
use record_sink::RecordSink;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Mutex;
use sync_core::{Record, Schema};

/// Writes SCHEMA, RECORD and STATE messages to a writer, one per line.
///
/// Used both as the record sink and, when no state file is configured, as
/// the state transport.
pub struct MessageWriter<W: Write + Send> {
    out: Mutex<W>,
}

impl MessageWriter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> MessageWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|_| anyhow!("message writer lock poisoned"))
    }

    fn emit(&self, message: &Value) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow!("message writer lock poisoned"))?;
        serde_json::to_writer(&mut *out, message).context("Failed to serialize message")?;
        out.write_all(b"\n").context("Failed to write message")?;
        out.flush().context("Failed to flush output")?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> RecordSink for MessageWriter<W> {
    async fn write_schema(&self, stream: &str, schema: &Schema, primary_keys: &[String]) -> Result<()> {
        self.emit(&json!({
            "type": "SCHEMA",
            "stream": stream,
            "schema": schema,
            "key_properties": primary_keys,
        }))
    }

    async fn write_record(&self, stream: &str, record: &Record) -> Result<()> {
        self.emit(&json!({
            "type": "RECORD",
            "stream": stream,
            "record": record,
        }))
    }
}

#[async_trait]
impl<W: Write + Send> CheckpointStore for MessageWriter<W> {
    async fn store_state(&self, snapshot: &StateSnapshot) -> Result<()> {
        self.emit(&json!({
            "type": "STATE",
            "value": snapshot,
        }))
    }

    /// State written to the output stream cannot be read back; callers seed
    /// it explicitly instead.
    async fn read_state(&self) -> Result<Option<StateSnapshot>> {
        Ok(None)
    }
}
