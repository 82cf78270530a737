use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::classify::Classification;

/// Label attached on the tracker side, independent of title classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

/// One open submission, already classified by title.
#[derive(Debug, Clone)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub author: Author,
    pub comments: u64,
    pub classification: Classification,
}

/// Category name mapped to its issue count. Holds the 全部 sentinel, the
/// four title-derived categories, and every label name seen so far.
pub type CategoryMap = HashMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    Oldest,
    MostCommented,
    RecentlyUpdated,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::MostCommented,
        SortKey::RecentlyUpdated,
    ];

    /// Parse a configured sort name. Unknown names yield `None`, which
    /// leaves the collection in accumulated order.
    pub fn parse(name: &str) -> Option<SortKey> {
        match name {
            "newest" => Some(SortKey::Newest),
            "oldest" => Some(SortKey::Oldest),
            "most-commented" => Some(SortKey::MostCommented),
            "recently-updated" => Some(SortKey::RecentlyUpdated),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest first",
            SortKey::Oldest => "Oldest first",
            SortKey::MostCommented => "Most commented",
            SortKey::RecentlyUpdated => "Recently updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Newest => write!(f, "newest"),
            SortKey::Oldest => write!(f, "oldest"),
            SortKey::MostCommented => write!(f, "most-commented"),
            SortKey::RecentlyUpdated => write!(f, "recently-updated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_sort_key() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(SortKey::parse("hottest"), None);
        assert_eq!(SortKey::parse(""), None);
        assert_eq!(SortKey::parse("Newest"), None);
    }
}
