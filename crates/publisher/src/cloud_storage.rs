use crate::error::PublishError;
use crate::table::Table;
use crate::PublishSink;
use async_trait::async_trait;

/// Publishes tables as CSV objects through the storage JSON API, one object
/// per table at `{prefix}/{table}.csv`.
pub struct CloudStorageSink {
    client: reqwest::Client,
    bucket: String,
    prefix: String,
    access_token: String,
}

impl CloudStorageSink {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            bucket: bucket.into(),
            prefix: prefix.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl PublishSink for CloudStorageSink {
    async fn publish(&self, table: &Table) -> Result<(), PublishError> {
        let object = format!("{}/{}.csv", self.prefix, table.name());
        let url = format!(
            "https://storage.googleapis.com/upload/storage/v1/b/{}/o",
            self.bucket
        );

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(table.to_csv())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                table: table.name().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(table = table.name(), object, "updated cloud storage object");
        Ok(())
    }
}
