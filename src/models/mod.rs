pub mod bids;
pub mod jobs;
pub mod users;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// A list of strings stored in a single JSONB column
/// (skills, software preferences, deliverables, included services).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Case-insensitive substring match against any element.
    pub fn contains_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.0.iter().any(|s| s.to_lowercase().contains(&needle))
    }
}
