use crate::categories;
use crate::types::{Issue, SortKey};

/// User-controlled projection inputs. Changing any of them re-projects the
/// accumulated collection; none of them touch the network.
#[derive(Debug, Clone)]
pub struct Filters {
    pub category: String,
    pub query: String,
    pub sort: Option<SortKey>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            category: categories::ALL.to_string(),
            query: String::new(),
            sort: Some(SortKey::Newest),
        }
    }
}

/// Project the collection into render order: category filter, then search
/// filter, then sort. Returns indices into `issues`. The sort is stable,
/// so ties keep accumulated order.
pub fn project(issues: &[Issue], filters: &Filters) -> Vec<usize> {
    let query = filters.query.to_lowercase();

    let mut visible: Vec<usize> = issues
        .iter()
        .enumerate()
        .filter(|(_, issue)| in_category(issue, &filters.category))
        .filter(|(_, issue)| query.is_empty() || matches_query(issue, &query))
        .map(|(idx, _)| idx)
        .collect();

    match filters.sort {
        Some(SortKey::Newest) => {
            visible.sort_by(|&a, &b| issues[b].created_at.cmp(&issues[a].created_at));
        }
        Some(SortKey::Oldest) => {
            visible.sort_by(|&a, &b| issues[a].created_at.cmp(&issues[b].created_at));
        }
        Some(SortKey::MostCommented) => {
            visible.sort_by(|&a, &b| issues[b].comments.cmp(&issues[a].comments));
        }
        Some(SortKey::RecentlyUpdated) => {
            visible.sort_by(|&a, &b| issues[b].updated_at.cmp(&issues[a].updated_at));
        }
        None => {}
    }

    visible
}

fn in_category(issue: &Issue, category: &str) -> bool {
    match category {
        categories::ALL => true,
        categories::OPEN_SOURCE => issue.classification.open_source,
        categories::TOOL => issue.classification.tool,
        categories::WEBSITE => issue.classification.website,
        categories::ARTICLE => issue.classification.article,
        label => issue.labels.iter().any(|l| l.name == label),
    }
}

/// Case-insensitive substring match over title and body. `query` must
/// already be lowercased.
fn matches_query(issue: &Issue, query: &str) -> bool {
    issue.title.to_lowercase().contains(query) || issue.body.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::types::{Author, Label};
    use chrono::{Duration, TimeZone, Utc};

    struct Seed<'a> {
        title: &'a str,
        body: &'a str,
        labels: &'a [&'a str],
        created_offset: i64,
        updated_offset: i64,
        comments: u64,
    }

    impl Default for Seed<'_> {
        fn default() -> Self {
            Self {
                title: "普通反馈",
                body: "",
                labels: &[],
                created_offset: 0,
                updated_offset: 0,
                comments: 0,
            }
        }
    }

    fn issue(id: u64, seed: Seed<'_>) -> Issue {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Issue {
            id,
            number: id,
            title: seed.title.to_string(),
            body: seed.body.to_string(),
            labels: seed
                .labels
                .iter()
                .enumerate()
                .map(|(i, name)| Label {
                    id: i as u64,
                    name: name.to_string(),
                    color: String::new(),
                })
                .collect(),
            created_at: base + Duration::hours(seed.created_offset),
            updated_at: base + Duration::hours(seed.updated_offset),
            html_url: String::new(),
            author: Author {
                login: "alice".to_string(),
                avatar_url: String::new(),
                html_url: String::new(),
            },
            comments: seed.comments,
            classification: classify(seed.title),
        }
    }

    #[test]
    fn sentinel_category_shows_everything() {
        let issues = vec![
            issue(0, Seed::default()),
            issue(1, Seed { title: "开源自荐:工具箱", ..Seed::default() }),
        ];
        let visible = project(&issues, &Filters { sort: None, ..Filters::default() });
        assert_eq!(visible, vec![0, 1]);
    }

    #[test]
    fn builtin_category_filters_by_classification() {
        let issues = vec![
            issue(0, Seed { title: "开源自荐:工具箱", ..Seed::default() }),
            issue(1, Seed::default()),
            issue(2, Seed { title: "又一个开源自荐", ..Seed::default() }),
        ];
        let filters = Filters {
            category: categories::OPEN_SOURCE.to_string(),
            sort: None,
            ..Filters::default()
        };
        assert_eq!(project(&issues, &filters), vec![0, 2]);
    }

    #[test]
    fn label_category_filters_by_label_name() {
        let issues = vec![
            issue(0, Seed { labels: &["weekly"], ..Seed::default() }),
            issue(1, Seed { labels: &["other"], ..Seed::default() }),
        ];
        let filters = Filters {
            category: "weekly".to_string(),
            sort: None,
            ..Filters::default()
        };
        assert_eq!(project(&issues, &filters), vec![0]);
    }

    #[test]
    fn search_matches_title_or_body_case_insensitively() {
        let issues = vec![
            issue(0, Seed { title: "一个 Rust 工具", ..Seed::default() }),
            issue(1, Seed { body: "written in rust", ..Seed::default() }),
            issue(2, Seed { title: "别的", body: "别的", ..Seed::default() }),
        ];
        let filters = Filters {
            query: "RUST".to_string(),
            sort: None,
            ..Filters::default()
        };
        assert_eq!(project(&issues, &filters), vec![0, 1]);
    }

    #[test]
    fn category_and_search_compose() {
        let issues = vec![
            issue(0, Seed { title: "开源自荐:rust 播放器", ..Seed::default() }),
            issue(1, Seed { title: "开源自荐:图片压缩", ..Seed::default() }),
            issue(2, Seed { title: "rust 周报", ..Seed::default() }),
        ];
        let filters = Filters {
            category: categories::OPEN_SOURCE.to_string(),
            query: "rust".to_string(),
            sort: None,
        };
        assert_eq!(project(&issues, &filters), vec![0]);
    }

    #[test]
    fn newest_sorts_by_creation_descending() {
        let issues = vec![
            issue(0, Seed { created_offset: 1, ..Seed::default() }),
            issue(1, Seed { created_offset: 3, ..Seed::default() }),
            issue(2, Seed { created_offset: 2, ..Seed::default() }),
        ];
        let filters = Filters { sort: Some(SortKey::Newest), ..Filters::default() };
        assert_eq!(project(&issues, &filters), vec![1, 2, 0]);
    }

    #[test]
    fn oldest_sorts_by_creation_ascending() {
        let issues = vec![
            issue(0, Seed { created_offset: 1, ..Seed::default() }),
            issue(1, Seed { created_offset: 3, ..Seed::default() }),
            issue(2, Seed { created_offset: 2, ..Seed::default() }),
        ];
        let filters = Filters { sort: Some(SortKey::Oldest), ..Filters::default() };
        assert_eq!(project(&issues, &filters), vec![0, 2, 1]);
    }

    #[test]
    fn most_commented_breaks_ties_by_accumulated_order() {
        let issues = vec![
            issue(0, Seed { comments: 2, ..Seed::default() }),
            issue(1, Seed { comments: 9, ..Seed::default() }),
            issue(2, Seed { comments: 2, ..Seed::default() }),
            issue(3, Seed { comments: 5, ..Seed::default() }),
        ];
        let filters = Filters { sort: Some(SortKey::MostCommented), ..Filters::default() };
        assert_eq!(project(&issues, &filters), vec![1, 3, 0, 2]);
    }

    #[test]
    fn recently_updated_sorts_by_update_descending() {
        let issues = vec![
            issue(0, Seed { updated_offset: 5, ..Seed::default() }),
            issue(1, Seed { updated_offset: 1, ..Seed::default() }),
            issue(2, Seed { updated_offset: 9, ..Seed::default() }),
        ];
        let filters = Filters { sort: Some(SortKey::RecentlyUpdated), ..Filters::default() };
        assert_eq!(project(&issues, &filters), vec![2, 0, 1]);
    }

    #[test]
    fn no_sort_keeps_accumulated_order() {
        let issues = vec![
            issue(0, Seed { created_offset: 1, ..Seed::default() }),
            issue(1, Seed { created_offset: 9, ..Seed::default() }),
            issue(2, Seed { created_offset: 5, ..Seed::default() }),
        ];
        let filters = Filters { sort: None, ..Filters::default() };
        assert_eq!(project(&issues, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn projection_leaves_the_collection_untouched() {
        let issues = vec![
            issue(0, Seed { created_offset: 1, ..Seed::default() }),
            issue(1, Seed { created_offset: 9, ..Seed::default() }),
        ];
        let before: Vec<u64> = issues.iter().map(|i| i.id).collect();
        let _ = project(&issues, &Filters::default());
        let after: Vec<u64> = issues.iter().map(|i| i.id).collect();
        assert_eq!(before, after);
    }
}
