use async_trait::async_trait;

pub mod cloud_storage;
pub mod error;
pub mod sheets;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use cloud_storage::CloudStorageSink;
pub use error::PublishError;
pub use sheets::SheetsSink;
pub use table::{Cell, Row, Table};

/// The abstract destination for a published table. The pipelines hand every
/// finished page to exactly one sink; nothing the sink returns flows back
/// into the computation.
#[async_trait]
pub trait PublishSink: Send + Sync {
    async fn publish(&self, table: &Table) -> Result<(), PublishError>;
}

/// Publishes each table to several sinks in order; the first failure aborts
/// the run, since no partial-publish recovery is specified.
pub struct MultiSink {
    sinks: Vec<Box<dyn PublishSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn PublishSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl PublishSink for MultiSink {
    async fn publish(&self, table: &Table) -> Result<(), PublishError> {
        for sink in &self.sinks {
            sink.publish(table).await?;
        }
        Ok(())
    }
}
