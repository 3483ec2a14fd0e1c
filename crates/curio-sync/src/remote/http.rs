//! Blocking HTTP implementation of `RemoteStore` against a
//! PostgREST-style row API: one endpoint per table, filters as query
//! parameters, soft deletes as PATCHes of the tombstone columns.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use curio_core::{
    CurioError, CurioResult, Item, ItemMetadata, ItemSpace, ItemTypeMetadata, RemoteError,
    RemoteStore, Space, SyncConfig, VideoTranscript,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpRemote {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Deserialize)]
struct IdRow {
    id: String,
}

impl HttpRemote {
    pub fn new(config: &SyncConfig) -> CurioResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CurioError::Config {
                reason: format!("http client: {e}"),
            })?;
        Ok(Self {
            base_url: config.remote_base_url.trim_end_matches('/').to_string(),
            api_key: config.remote_api_key.clone(),
            client,
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    fn send(&self, table: &str, id: &str, request: RequestBuilder) -> CurioResult<Response> {
        let response = request.send().map_err(|e| RemoteError::Network {
            reason: e.to_string(),
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::CONFLICT {
            return Err(RemoteError::UniqueViolation {
                table: table.to_string(),
                id: id.to_string(),
            }
            .into());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            }
            .into());
        }
        let message = response.text().unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    fn fetch_rows<T: DeserializeOwned>(&self, table: &str, user_id: &str) -> CurioResult<Vec<T>> {
        let request = self
            .auth(self.client.get(self.url(table)))
            .query(&[("user_id", format!("eq.{user_id}")), ("select", "*".into())]);
        let body = self
            .send(table, user_id, request)?
            .text()
            .map_err(|e| RemoteError::Network {
                reason: e.to_string(),
            })?;
        Ok(serde_json::from_str(&body)?)
    }

    fn insert_row<T: Serialize>(&self, table: &str, id: &str, row: &T) -> CurioResult<()> {
        let request = self
            .auth(self.client.post(self.url(table)))
            .header("Prefer", "return=minimal")
            .json(row);
        self.send(table, id, request).map(|_| ())
    }

    fn upsert_row<T: Serialize>(&self, table: &str, id: &str, row: &T) -> CurioResult<()> {
        let request = self
            .auth(self.client.post(self.url(table)))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row);
        self.send(table, id, request).map(|_| ())
    }

    fn patch_rows(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: serde_json::Value,
    ) -> CurioResult<()> {
        let id = filters
            .first()
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let request = self
            .auth(self.client.patch(self.url(table)))
            .query(filters)
            .header("Prefer", "return=minimal")
            .json(&patch);
        self.send(table, &id, request).map(|_| ())
    }

    fn tombstone_patch(at: DateTime<Utc>) -> serde_json::Value {
        json!({
            "is_deleted": true,
            "deleted_at": at,
            "updated_at": at,
        })
    }

    fn id_set(&self, table: &str, user_id: &str) -> CurioResult<HashSet<String>> {
        let request = self
            .auth(self.client.get(self.url(table)))
            .query(&[("user_id", format!("eq.{user_id}")), ("select", "id".into())]);
        let body = self
            .send(table, user_id, request)?
            .text()
            .map_err(|e| RemoteError::Network {
                reason: e.to_string(),
            })?;
        let rows: Vec<IdRow> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }
}

impl RemoteStore for HttpRemote {
    fn probe(&self) -> bool {
        let request = self.auth(self.client.get(format!("{}/rest/v1/", self.base_url)));
        match request.send() {
            Ok(response) => response.status() != StatusCode::SERVICE_UNAVAILABLE,
            Err(_) => false,
        }
    }

    fn fetch_items(&self, user_id: &str) -> CurioResult<Vec<Item>> {
        self.fetch_rows("items", user_id)
    }

    fn insert_item(&self, item: &Item) -> CurioResult<()> {
        self.insert_row("items", &item.id, item)
    }

    fn update_item(&self, item: &Item) -> CurioResult<()> {
        self.patch_rows(
            "items",
            &[("id", format!("eq.{}", item.id))],
            serde_json::to_value(item)?,
        )
    }

    fn soft_delete_item(&self, id: &str, deleted_at: DateTime<Utc>) -> CurioResult<()> {
        self.patch_rows(
            "items",
            &[("id", format!("eq.{id}"))],
            Self::tombstone_patch(deleted_at),
        )
    }

    fn fetch_spaces(&self, user_id: &str) -> CurioResult<Vec<Space>> {
        self.fetch_rows("spaces", user_id)
    }

    fn insert_space(&self, space: &Space) -> CurioResult<()> {
        self.insert_row("spaces", &space.id, space)
    }

    fn update_space(&self, space: &Space) -> CurioResult<()> {
        self.patch_rows(
            "spaces",
            &[("id", format!("eq.{}", space.id))],
            serde_json::to_value(space)?,
        )
    }

    fn fetch_item_spaces(&self, user_id: &str) -> CurioResult<Vec<ItemSpace>> {
        self.fetch_rows("item_spaces", user_id)
    }

    fn insert_item_space(&self, relation: &ItemSpace) -> CurioResult<()> {
        self.insert_row(
            "item_spaces",
            &format!("{}:{}", relation.item_id, relation.space_id),
            relation,
        )
    }

    fn delete_item_space(&self, item_id: &str, space_id: &str) -> CurioResult<()> {
        let request = self
            .auth(self.client.delete(self.url("item_spaces")))
            .query(&[
                ("item_id", format!("eq.{item_id}")),
                ("space_id", format!("eq.{space_id}")),
            ]);
        self.send("item_spaces", item_id, request).map(|_| ())
    }

    fn fetch_item_metadata(&self, user_id: &str) -> CurioResult<Vec<ItemMetadata>> {
        self.fetch_rows("item_metadata", user_id)
    }

    fn upsert_item_metadata(&self, meta: &ItemMetadata) -> CurioResult<()> {
        self.upsert_row("item_metadata", &meta.item_id, meta)
    }

    fn fetch_item_type_metadata(&self, user_id: &str) -> CurioResult<Vec<ItemTypeMetadata>> {
        self.fetch_rows("item_type_metadata", user_id)
    }

    fn upsert_item_type_metadata(&self, meta: &ItemTypeMetadata) -> CurioResult<()> {
        self.upsert_row("item_type_metadata", &meta.item_id, meta)
    }

    fn fetch_video_transcripts(&self, user_id: &str) -> CurioResult<Vec<VideoTranscript>> {
        self.fetch_rows("video_transcripts", user_id)
    }

    fn insert_video_transcript(&self, transcript: &VideoTranscript) -> CurioResult<()> {
        self.insert_row("video_transcripts", &transcript.item_id, transcript)
    }

    fn update_video_transcript(&self, transcript: &VideoTranscript) -> CurioResult<()> {
        self.patch_rows(
            "video_transcripts",
            &[("item_id", format!("eq.{}", transcript.item_id))],
            serde_json::to_value(transcript)?,
        )
    }

    fn soft_delete_video_transcript(
        &self,
        item_id: &str,
        deleted_at: DateTime<Utc>,
    ) -> CurioResult<()> {
        self.patch_rows(
            "video_transcripts",
            &[("item_id", format!("eq.{item_id}"))],
            Self::tombstone_patch(deleted_at),
        )
    }

    fn item_id_set(&self, user_id: &str) -> CurioResult<HashSet<String>> {
        self.id_set("items", user_id)
    }

    fn space_id_set(&self, user_id: &str) -> CurioResult<HashSet<String>> {
        self.id_set("spaces", user_id)
    }
}
