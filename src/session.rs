use crate::source::{FetchMode, Page};
use crate::types::Issue;

/// Accumulated fetch state for one browsing session.
///
/// `generation` changes on every reset so that completions spawned before
/// the reset can be recognized and dropped instead of polluting the new
/// session.
#[derive(Debug)]
pub struct Session {
    pub issues: Vec<Issue>,
    pub pages_loaded: u32,
    pub has_more: bool,
    pub generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            pages_loaded: 0,
            has_more: true,
            generation: 0,
        }
    }

    /// Page number the next fetch should request, 1-based.
    pub fn next_page(&self) -> u32 {
        self.pages_loaded + 1
    }

    /// Drop all accumulated state and start a new generation. Returns the
    /// new generation for tagging the fetch that follows.
    pub fn reset(&mut self) -> u64 {
        self.issues.clear();
        self.pages_loaded = 0;
        self.has_more = true;
        self.generation += 1;
        self.generation
    }

    /// Fold one fetched page into the collection. Replace discards prior
    /// state; Append keeps strict arrival order. An exhausted page latches
    /// `has_more` off, and under Append nothing ever turns it back on.
    pub fn merge(&mut self, page: Page, mode: FetchMode) {
        match mode {
            FetchMode::Replace => {
                self.issues = page.issues;
                self.pages_loaded = 1;
                self.has_more = !page.exhausted;
            }
            FetchMode::Append => {
                self.issues.extend(page.issues);
                self.pages_loaded += 1;
                if page.exhausted {
                    self.has_more = false;
                }
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
