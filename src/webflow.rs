use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_derive::Serialize;
use tracing::{info, instrument};

use crate::domain::{ContentPublisher, PublishError};
use crate::fields::FieldPayload;

/// Publishes the field payload to a single live item of a Webflow collection.
#[derive(Clone)]
pub(crate) struct WebflowPublisher {
    client: Client,
    item_url: String,
    bearer_token: String,
}

impl WebflowPublisher {
    pub(crate) fn new(
        base_url: &str,
        collection_id: &str,
        item_id: &str,
        bearer_token: String,
    ) -> Self {
        Self {
            client: Client::new(),
            item_url: format!(
                "{}/v2/collections/{}/items/{}/live",
                base_url.trim_end_matches('/'),
                collection_id,
                item_id
            ),
            bearer_token,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ItemUpdate<'a> {
    is_archived: bool,
    is_draft: bool,
    field_data: &'a FieldPayload,
}

#[async_trait]
impl ContentPublisher for WebflowPublisher {
    #[instrument(skip_all)]
    async fn publish(&self, fields: &FieldPayload) -> Result<(), PublishError> {
        let update = ItemUpdate {
            is_archived: false,
            is_draft: false,
            field_data: fields,
        };

        let response = self
            .client
            .patch(&self.item_url)
            .header("accept", "application/json")
            .header("authorization", format!("Bearer {}", self.bearer_token))
            .json(&update)
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .map_err(|e| PublishError::Request(e.to_string()))?;

            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Webflow item updated successfully");

        Ok(())
    }
}
