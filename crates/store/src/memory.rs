use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

use crate::{
    Airdrop, AirdropChanges, AirdropFilter, AirdropStore, ChangeEvent, ChangeFeed, ChangeKind,
    ChangeSource, NewAirdrop, NewSuggestion, RecordId, StoreError, Subscription, Suggestion,
    SuggestionStore, Table,
};

#[derive(Default)]
struct Tables {
    next_id: RecordId,
    airdrops: BTreeMap<RecordId, Airdrop>,
    suggestions: BTreeMap<RecordId, Suggestion>,
}

impl Tables {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store behind a `RwLock`. Mirrors the REST store's ordering
/// and publishes every write on its own [`ChangeFeed`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))
    }
}

/// Newest first; ids break ties between rows created in the same instant.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, RecordId)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn create_suggestion(&self, row: &NewSuggestion) -> Result<Suggestion, StoreError> {
        let suggestion = {
            let mut tables = self.write()?;
            let id = tables.allocate_id();
            let suggestion = Suggestion {
                id,
                project_name: row.project_name.clone(),
                description: row.description.clone(),
                official_link: row.official_link.clone(),
                user_email: row.user_email.clone(),
                criteria_notes: row.criteria_notes.clone(),
                processed: false,
                created_at: Utc::now(),
            };
            tables.suggestions.insert(id, suggestion.clone());
            suggestion
        };
        debug!(id = suggestion.id, "memory_suggestion_inserted");
        self.feed.publish(ChangeEvent::new(
            Table::Suggestions,
            ChangeKind::Inserted,
            &suggestion,
        ));
        Ok(suggestion)
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, StoreError> {
        let mut rows: Vec<Suggestion> = self.read()?.suggestions.values().cloned().collect();
        newest_first(&mut rows, |s| (s.created_at, s.id));
        Ok(rows)
    }

    async fn mark_suggestion_processed(&self, id: RecordId) -> Result<Suggestion, StoreError> {
        let suggestion = {
            let mut tables = self.write()?;
            let row = tables
                .suggestions
                .get_mut(&id)
                .ok_or(StoreError::NotFound(id))?;
            row.processed = true;
            row.clone()
        };
        self.feed.publish(ChangeEvent::new(
            Table::Suggestions,
            ChangeKind::Updated,
            &suggestion,
        ));
        Ok(suggestion)
    }
}

#[async_trait]
impl AirdropStore for MemoryStore {
    async fn list_airdrops(&self, filter: &AirdropFilter) -> Result<Vec<Airdrop>, StoreError> {
        let mut rows: Vec<Airdrop> = self
            .read()?
            .airdrops
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        newest_first(&mut rows, |a| (a.created_at, a.id));
        Ok(rows)
    }

    async fn get_airdrop(&self, id: RecordId) -> Result<Option<Airdrop>, StoreError> {
        Ok(self.read()?.airdrops.get(&id).cloned())
    }

    async fn create_airdrop(&self, row: &NewAirdrop) -> Result<Airdrop, StoreError> {
        let airdrop = {
            let mut tables = self.write()?;
            let id = tables.allocate_id();
            let airdrop = Airdrop {
                id,
                name: row.name.clone(),
                description: row.description.clone(),
                status: row.status,
                official_link: row.official_link.clone(),
                created_at: Utc::now(),
                extra: row.extra.clone(),
            };
            tables.airdrops.insert(id, airdrop.clone());
            airdrop
        };
        self.feed.publish(ChangeEvent::new(
            Table::Airdrops,
            ChangeKind::Inserted,
            &airdrop,
        ));
        Ok(airdrop)
    }

    async fn update_airdrop(
        &self,
        id: RecordId,
        changes: &AirdropChanges,
    ) -> Result<Airdrop, StoreError> {
        let airdrop = {
            let mut tables = self.write()?;
            let row = tables.airdrops.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            changes.apply(row);
            row.clone()
        };
        self.feed.publish(ChangeEvent::new(
            Table::Airdrops,
            ChangeKind::Updated,
            &airdrop,
        ));
        Ok(airdrop)
    }

    async fn delete_airdrop(&self, id: RecordId) -> Result<(), StoreError> {
        let removed = self.write()?.airdrops.remove(&id);
        if let Some(airdrop) = removed {
            self.feed.publish(ChangeEvent::new(
                Table::Airdrops,
                ChangeKind::Deleted,
                &airdrop,
            ));
        }
        Ok(())
    }

    async fn count_airdrops(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.airdrops.len() as u64)
    }
}

impl ChangeSource for MemoryStore {
    fn subscribe(&self, table: Table) -> Subscription {
        self.feed.subscribe(table)
    }
}
