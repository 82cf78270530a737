use async_trait::async_trait;

use crate::error::Result;
use crate::types::Issue;

/// Whether a fetched page starts the session over or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

/// One fetch unit: up to a full page of already classified issues.
#[derive(Debug)]
pub struct Page {
    pub issues: Vec<Issue>,
    /// True when the upstream returned fewer items than the page size,
    /// meaning no further pages exist.
    pub exhausted: bool,
    /// Remaining request quota reported by the upstream, when it says.
    pub rate_remaining: Option<u64>,
}

/// The remote open-issues listing, page by page.
#[async_trait]
pub trait IssueSource: Send + Sync + std::fmt::Debug {
    async fn fetch_page(&self, page: u32) -> Result<Page>;
}
