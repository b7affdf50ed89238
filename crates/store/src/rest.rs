//! PostgREST client for the hosted Supabase tables.

use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Airdrop, AirdropChanges, AirdropFilter, AirdropStatus, AirdropStore, ChangeEvent, ChangeFeed,
    ChangeKind, ChangeSource, NewAirdrop, NewSuggestion, RecordId, StatusCounts, StoreConfig,
    StoreError, Subscription, Suggestion, SuggestionStore, Table,
};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";
const NEWEST_FIRST: &str = "created_at.desc";

#[derive(Deserialize)]
struct StatusOnly {
    #[serde(default)]
    status: AirdropStatus,
}

#[derive(Serialize)]
struct ProcessedFlag {
    processed: bool,
}

/// Talks to `{url}/rest/v1/{table}`. Writes made through this client are
/// echoed on its [`ChangeFeed`].
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    config: StoreConfig,
    feed: ChangeFeed,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        if !config.is_configured() {
            warn!("store_not_configured: requests will be refused");
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(4)
            .build()?;
        Ok(Self {
            http,
            config,
            feed: ChangeFeed::default(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn request(&self, method: Method, table: Table) -> Result<RequestBuilder, StoreError> {
        if !self.config.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        let key = self.config.anon_key.trim();
        Ok(self
            .http
            .request(method, self.config.table_url(table.as_str()))
            .header("apikey", key)
            .bearer_auth(key))
    }

    async fn execute(table: Table, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(table = %table, status = status.as_u16(), body = %body, "store_request_failed");
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn rows<T: DeserializeOwned>(
        table: Table,
        builder: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = Self::execute(table, builder).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    /// First row of a `return=representation` write.
    async fn returned<T: DeserializeOwned>(
        table: Table,
        builder: RequestBuilder,
    ) -> Result<T, StoreError> {
        Self::rows(table, builder.header(PREFER, RETURN_REPRESENTATION))
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NoRowReturned)
    }

    fn publish<T: Serialize>(&self, table: Table, kind: ChangeKind, record: &T) {
        self.feed.publish(ChangeEvent::new(table, kind, record));
    }
}

fn eq_id(id: RecordId) -> String {
    format!("eq.{id}")
}

/// `in.(active,upcoming)`, or nothing for an unrestricted filter.
fn status_filter(filter: &AirdropFilter) -> Option<String> {
    if filter.statuses.is_empty() {
        return None;
    }
    let joined: Vec<&str> = filter.statuses.iter().map(AirdropStatus::as_str).collect();
    Some(format!("in.({})", joined.join(",")))
}

/// Total from a `Content-Range` value such as `0-24/3573` or `*/0`.
fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl SuggestionStore for RestStore {
    async fn create_suggestion(&self, row: &NewSuggestion) -> Result<Suggestion, StoreError> {
        let table = Table::Suggestions;
        let builder = self.request(Method::POST, table)?.json(&[row]);
        let suggestion: Suggestion = Self::returned(table, builder).await?;
        debug!(id = suggestion.id, "rest_suggestion_inserted");
        self.publish(table, ChangeKind::Inserted, &suggestion);
        Ok(suggestion)
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, StoreError> {
        let table = Table::Suggestions;
        let builder = self
            .request(Method::GET, table)?
            .query(&[("select", "*"), ("order", NEWEST_FIRST)]);
        Self::rows(table, builder).await
    }

    async fn mark_suggestion_processed(&self, id: RecordId) -> Result<Suggestion, StoreError> {
        let table = Table::Suggestions;
        let builder = self
            .request(Method::PATCH, table)?
            .query(&[("id", eq_id(id))])
            .json(&ProcessedFlag { processed: true });
        let suggestion: Suggestion = Self::returned(table, builder)
            .await
            .map_err(|err| match err {
                StoreError::NoRowReturned => StoreError::NotFound(id),
                other => other,
            })?;
        self.publish(table, ChangeKind::Updated, &suggestion);
        Ok(suggestion)
    }
}

#[async_trait]
impl AirdropStore for RestStore {
    async fn list_airdrops(&self, filter: &AirdropFilter) -> Result<Vec<Airdrop>, StoreError> {
        let table = Table::Airdrops;
        let mut builder = self
            .request(Method::GET, table)?
            .query(&[("select", "*"), ("order", NEWEST_FIRST)]);
        if let Some(statuses) = status_filter(filter) {
            builder = builder.query(&[("status", statuses)]);
        }
        Self::rows(table, builder).await
    }

    async fn get_airdrop(&self, id: RecordId) -> Result<Option<Airdrop>, StoreError> {
        let table = Table::Airdrops;
        let builder = self
            .request(Method::GET, table)?
            .query(&[("select", "*".to_string()), ("id", eq_id(id))])
            .query(&[("limit", "1")]);
        let rows: Vec<Airdrop> = Self::rows(table, builder).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_airdrop(&self, row: &NewAirdrop) -> Result<Airdrop, StoreError> {
        let table = Table::Airdrops;
        let builder = self.request(Method::POST, table)?.json(&[row]);
        let airdrop: Airdrop = Self::returned(table, builder).await?;
        self.publish(table, ChangeKind::Inserted, &airdrop);
        Ok(airdrop)
    }

    async fn update_airdrop(
        &self,
        id: RecordId,
        changes: &AirdropChanges,
    ) -> Result<Airdrop, StoreError> {
        let table = Table::Airdrops;
        let builder = self
            .request(Method::PATCH, table)?
            .query(&[("id", eq_id(id))])
            .json(changes);
        let airdrop: Airdrop = Self::returned(table, builder)
            .await
            .map_err(|err| match err {
                StoreError::NoRowReturned => StoreError::NotFound(id),
                other => other,
            })?;
        self.publish(table, ChangeKind::Updated, &airdrop);
        Ok(airdrop)
    }

    async fn delete_airdrop(&self, id: RecordId) -> Result<(), StoreError> {
        let table = Table::Airdrops;
        let builder = self
            .request(Method::DELETE, table)?
            .query(&[("id", eq_id(id))])
            .header(PREFER, RETURN_REPRESENTATION);
        let removed: Vec<Airdrop> = Self::rows(table, builder).await?;
        for airdrop in &removed {
            self.publish(table, ChangeKind::Deleted, airdrop);
        }
        Ok(())
    }

    async fn count_airdrops(&self) -> Result<u64, StoreError> {
        let table = Table::Airdrops;
        let builder = self
            .request(Method::HEAD, table)?
            .query(&[("select", "id")])
            .header(PREFER, COUNT_EXACT);
        let response = Self::execute(table, builder).await?;
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| StoreError::Decode("missing Content-Range total".into()))
    }

    async fn count_airdrops_by_status(&self) -> Result<StatusCounts, StoreError> {
        let table = Table::Airdrops;
        let builder = self
            .request(Method::GET, table)?
            .query(&[("select", "status")]);
        let rows: Vec<StatusOnly> = Self::rows(table, builder).await?;
        Ok(StatusCounts::tally(rows.into_iter().map(|row| row.status)))
    }
}

impl ChangeSource for RestStore {
    /// Only writes made through this client, plus whatever is pushed with
    /// [`ChangeFeed::publish`], reach the subscription. Changes made by other
    /// clients of the hosted project are not observed.
    fn subscribe(&self, table: Table) -> Subscription {
        self.feed.subscribe(table)
    }
}
