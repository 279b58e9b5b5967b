//! RecordSink trait definition.

use anyhow::Result;
use sync_core::{Record, Schema};

/// Trait for emitting synced data downstream.
///
/// # Usage Pattern
///
/// Pipelines are generic over the sink:
///
/// ```ignore
/// pub async fn sync_report<A: AdwordsApi, S: RecordSink>(
///     api: &A,
///     sink: &S,
///     ctx: &mut SyncContext,
/// ) -> Result<(), SyncError> {
///     sink.write_schema(&stream.name, &schema, &stream.primary_keys).await?;
///     sink.write_record(&stream.name, &record).await?;
/// }
/// ```
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    /// Declare the schema of a stream, once, before its first record.
    ///
    /// Callers strip discovery-only `inclusion` markers before calling.
    async fn write_schema(
        &self,
        stream: &str,
        schema: &Schema,
        primary_keys: &[String],
    ) -> Result<()>;

    /// Emit one typed record.
    async fn write_record(&self, stream: &str, record: &Record) -> Result<()>;
}
