//! Change notifications for stored tables.

use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use crate::{StoreError, Table};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// One row change. `record` is the new row, or the removed one for deletions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub record: Value,
}

impl ChangeEvent {
    pub fn new<T: Serialize>(table: Table, kind: ChangeKind, record: &T) -> Self {
        Self {
            table,
            kind,
            record: serde_json::to_value(record).unwrap_or_default(),
        }
    }

    /// Decodes the row into one of the record types.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.record.clone()).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Fan-out hub for [`ChangeEvent`]s. Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Delivers `event` to every live subscription; returns how many receivers saw it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, table: Table) -> Subscription {
        debug!(table = %table, "subscription_opened");
        Subscription {
            table,
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Live view of changes on one table. Dropping it (or calling
/// [`Subscription::unsubscribe`]) releases the receiver.
#[derive(Debug)]
pub struct Subscription {
    table: Table,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn table(&self) -> Table {
        self.table
    }

    /// Waits for the next change on this table. `None` once the feed is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.table == self.table => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!(table = %self.table, missed, "subscription_lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.table == self.table => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(table = %self.table, missed, "subscription_lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent> + Send {
        stream::unfold(self, |mut sub| async move {
            let event = sub.recv().await?;
            Some((event, sub))
        })
    }

    pub fn unsubscribe(self) {
        debug!(table = %self.table, "subscription_closed");
    }
}

/// Sources that can stream row changes.
pub trait ChangeSource {
    fn subscribe(&self, table: Table) -> Subscription;
}

impl ChangeSource for ChangeFeed {
    fn subscribe(&self, table: Table) -> Subscription {
        ChangeFeed::subscribe(self, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    fn event(table: Table, id: i64) -> ChangeEvent {
        ChangeEvent::new(table, ChangeKind::Inserted, &json!({ "id": id }))
    }

    #[tokio::test]
    async fn subscription_only_sees_its_table() {
        let feed = ChangeFeed::default();
        let mut sub = feed.subscribe(Table::Airdrops);

        feed.publish(event(Table::Suggestions, 1));
        feed.publish(event(Table::Airdrops, 2));

        let got = sub.recv().await.unwrap();
        assert_eq!(got.table, Table::Airdrops);
        assert_eq!(got.record["id"], 2);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn lagging_subscriber_keeps_receiving() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe(Table::Airdrops);
        for id in 0..5 {
            feed.publish(event(Table::Airdrops, id));
        }
        let got = sub.recv().await.unwrap();
        assert_eq!(got.record["id"], 3);
        assert_eq!(sub.recv().await.unwrap().record["id"], 4);
    }

    #[tokio::test]
    async fn stream_ends_when_feed_is_dropped() {
        let feed = ChangeFeed::default();
        let sub = feed.subscribe(Table::Suggestions);
        feed.publish(event(Table::Suggestions, 9));
        drop(feed);

        let events: Vec<_> = sub.into_stream().collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].record["id"], 9);
    }

    #[test]
    fn unsubscribe_releases_receiver() {
        let feed = ChangeFeed::default();
        let sub = feed.subscribe(Table::Airdrops);
        assert_eq!(feed.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(feed.subscriber_count(), 0);
        assert_eq!(feed.publish(event(Table::Airdrops, 1)), 0);
    }

    #[test]
    fn decode_into_record_type() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: i64,
        }
        let row: Row = event(Table::Airdrops, 5).decode().unwrap();
        assert_eq!(row.id, 5);
    }
}
