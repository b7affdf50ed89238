use async_trait::async_trait;

use crate::{
    Airdrop, AirdropChanges, AirdropFilter, NewAirdrop, NewSuggestion, RecordId, StatusCounts,
    StoreError, Suggestion,
};

/// Persistence for submitted suggestions.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Inserts the row and returns it as stored, with its id and timestamp.
    async fn create_suggestion(&self, row: &NewSuggestion) -> Result<Suggestion, StoreError>;

    /// All suggestions, newest first.
    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, StoreError>;

    async fn mark_suggestion_processed(&self, id: RecordId) -> Result<Suggestion, StoreError>;
}

/// Persistence for the airdrop catalogue.
#[async_trait]
pub trait AirdropStore: Send + Sync {
    /// Airdrops matching `filter`, newest first.
    async fn list_airdrops(&self, filter: &AirdropFilter) -> Result<Vec<Airdrop>, StoreError>;

    async fn get_airdrop(&self, id: RecordId) -> Result<Option<Airdrop>, StoreError>;

    async fn create_airdrop(&self, row: &NewAirdrop) -> Result<Airdrop, StoreError>;

    async fn update_airdrop(
        &self,
        id: RecordId,
        changes: &AirdropChanges,
    ) -> Result<Airdrop, StoreError>;

    async fn delete_airdrop(&self, id: RecordId) -> Result<(), StoreError>;

    async fn count_airdrops(&self) -> Result<u64, StoreError> {
        Ok(self.list_airdrops(&AirdropFilter::all()).await?.len() as u64)
    }

    async fn count_airdrops_by_status(&self) -> Result<StatusCounts, StoreError> {
        let airdrops = self.list_airdrops(&AirdropFilter::all()).await?;
        Ok(StatusCounts::tally(airdrops.iter().map(|a| a.status)))
    }
}
