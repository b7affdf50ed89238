use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use suggest::SuggestionInput;

/// Primary key of a stored row.
pub type RecordId = i64;

/// Tables the client reads, writes and watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "airdrops")]
    Airdrops,
    #[serde(rename = "airdrop_suggestions")]
    Suggestions,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Airdrops => "airdrops",
            Table::Suggestions => "airdrop_suggestions",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage of an airdrop. Rows carrying any other value, or none,
/// decode as [`AirdropStatus::Unknown`] instead of failing the whole read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AirdropStatus {
    Active,
    Upcoming,
    Ended,
    #[default]
    Unknown,
}

impl AirdropStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirdropStatus::Active => "active",
            AirdropStatus::Upcoming => "upcoming",
            AirdropStatus::Ended => "ended",
            AirdropStatus::Unknown => "unknown",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => AirdropStatus::Active,
            "upcoming" => AirdropStatus::Upcoming,
            "ended" => AirdropStatus::Ended,
            _ => AirdropStatus::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for AirdropStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(AirdropStatus::Unknown, AirdropStatus::parse))
    }
}

/// Airdrop row as stored. Columns this crate does not model land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airdrop {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: AirdropStatus,
    #[serde(default)]
    pub official_link: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Insert payload for an airdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAirdrop {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: AirdropStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewAirdrop {
    pub fn new(name: impl Into<String>, status: AirdropStatus) -> Self {
        Self {
            name: name.into(),
            description: None,
            status,
            official_link: None,
            extra: Map::new(),
        }
    }
}

/// Partial update for an airdrop; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirdropChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AirdropStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AirdropChanges {
    pub fn status(status: AirdropStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub(crate) fn apply(&self, airdrop: &mut Airdrop) {
        if let Some(name) = &self.name {
            airdrop.name = name.clone();
        }
        if let Some(description) = &self.description {
            airdrop.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            airdrop.status = status;
        }
        if let Some(link) = &self.official_link {
            airdrop.official_link = Some(link.clone());
        }
        for (key, value) in &self.extra {
            airdrop.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Which airdrops to list. An empty status set means all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirdropFilter {
    pub statuses: Vec<AirdropStatus>,
}

impl AirdropFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Airdrops still worth showing: active and upcoming.
    pub fn active() -> Self {
        Self {
            statuses: vec![AirdropStatus::Active, AirdropStatus::Upcoming],
        }
    }

    pub fn matches(&self, airdrop: &Airdrop) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&airdrop.status)
    }
}

/// Number of airdrops per known status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub active: u64,
    pub upcoming: u64,
    pub ended: u64,
}

impl StatusCounts {
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AirdropStatus>,
    {
        let mut counts = Self::default();
        for status in statuses {
            match status {
                AirdropStatus::Active => counts.active += 1,
                AirdropStatus::Upcoming => counts.upcoming += 1,
                AirdropStatus::Ended => counts.ended += 1,
                AirdropStatus::Unknown => {}
            }
        }
        counts
    }
}

/// Suggestion row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: RecordId,
    pub project_name: String,
    pub description: String,
    pub official_link: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub criteria_notes: Option<String>,
    #[serde(default)]
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSuggestion {
    pub project_name: String,
    pub description: String,
    pub official_link: String,
    pub user_email: Option<String>,
    pub criteria_notes: Option<String>,
}

impl From<&SuggestionInput> for NewSuggestion {
    fn from(input: &SuggestionInput) -> Self {
        Self {
            project_name: input.project_name.trim().to_string(),
            description: input.description.trim().to_string(),
            official_link: input.official_link.trim().to_string(),
            user_email: input.contact_email().map(str::to_string),
            criteria_notes: input.criteria_notes().map(str::to_string),
        }
    }
}
