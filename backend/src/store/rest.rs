use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use tracing::{debug, info, warn};

use crate::config::RestConfig;
use crate::error::StoreError;
use crate::models::Record;
use crate::store::RecordStore;
use crate::store::dto::{RecordRow, WriteRecordRequest};

/// Record store speaking the PostgREST dialect exposed by Supabase.
pub struct RestRecordStore {
    client: Client,
    config: RestConfig,
}

impl RestRecordStore {
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn table_url(&self) -> Result<Url, StoreError> {
        let mut url = self.config.base_url.clone();
        let base = &self.config.base_url;
        url.path_segments_mut()
            .map_err(|_| StoreError::Decode(format!("{} cannot be a base URL", base)))?
            .pop_if_empty()
            .extend(["rest", "v1", self.config.table.as_str()]);
        Ok(url)
    }

    fn row_url(&self, id: &str) -> Result<Url, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.config.api_key.as_str())
            .bearer_auth(&self.config.api_key)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("record store error {}: {}", status, body);
            return Err(StoreError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Sends a filtered write that asks for the affected rows back, so a
    /// missing id can be told apart from a successful write.
    async fn write_returning(&self, request: RequestBuilder, id: &str) -> Result<(), StoreError> {
        let response = self
            .authorize(request)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        if rows.is_empty() {
            return Err(StoreError::RowNotAffected(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self.authorize(self.client.get(url)).send().await?;
        let rows: Vec<RecordRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match Record::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Failed to parse record row: {}", e),
            }
        }
        debug!("fetched {} records from {}", records.len(), self.config.table);
        Ok(records)
    }

    async fn insert(&self, title: &str, time: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.table_url()?)
            .header("Prefer", "return=minimal")
            .json(&WriteRecordRequest { title, time });

        let response = self.authorize(request).send().await?;
        Self::check(response).await?;
        info!("inserted record into {}", self.config.table);
        Ok(())
    }

    async fn update_by_id(&self, id: &str, title: &str, time: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.row_url(id)?)
            .json(&WriteRecordRequest { title, time });

        self.write_returning(request, id).await?;
        info!("updated record {}", id);
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let request = self.client.delete(self.row_url(id)?);

        self.write_returning(request, id).await?;
        info!("deleted record {}", id);
        Ok(())
    }
}
