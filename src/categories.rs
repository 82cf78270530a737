use crate::types::{CategoryMap, Issue};

/// Sentinel category that always covers the whole collection.
pub const ALL: &str = "全部";
pub const OPEN_SOURCE: &str = "开源自荐";
pub const TOOL: &str = "工具自荐";
pub const WEBSITE: &str = "网站自荐";
pub const ARTICLE: &str = "文章自荐";

pub const BUILT_IN: [&str; 4] = [OPEN_SOURCE, TOOL, WEBSITE, ARTICLE];

/// Labels the tracker uses for its own bookkeeping; never surfaced as
/// categories.
const RESERVED_LABEL_PREFIX: &str = "issue-";

/// Rebuild every category count from scratch over the full collection.
/// Incremental updates are not worth the bookkeeping at this scale.
pub fn recompute(issues: &[Issue]) -> CategoryMap {
    let mut map = CategoryMap::new();
    map.insert(ALL.to_string(), issues.len());
    map.insert(
        OPEN_SOURCE.to_string(),
        issues.iter().filter(|i| i.classification.open_source).count(),
    );
    map.insert(
        TOOL.to_string(),
        issues.iter().filter(|i| i.classification.tool).count(),
    );
    map.insert(
        WEBSITE.to_string(),
        issues.iter().filter(|i| i.classification.website).count(),
    );
    map.insert(
        ARTICLE.to_string(),
        issues.iter().filter(|i| i.classification.article).count(),
    );

    for issue in issues {
        for label in &issue.labels {
            if label.name.starts_with(RESERVED_LABEL_PREFIX) {
                continue;
            }
            *map.entry(label.name.clone()).or_insert(0) += 1;
        }
    }

    map
}

/// Display order: 全部 first, then the built-in categories, then label
/// categories by descending count with name as the tie breaker.
pub fn ordered(map: &CategoryMap) -> Vec<(String, usize)> {
    let mut out = Vec::with_capacity(map.len() + 1);
    out.push((ALL.to_string(), map.get(ALL).copied().unwrap_or(0)));
    for name in BUILT_IN {
        out.push((name.to_string(), map.get(name).copied().unwrap_or(0)));
    }

    let mut labels: Vec<(String, usize)> = map
        .iter()
        .filter(|(name, _)| name.as_str() != ALL && !BUILT_IN.contains(&name.as_str()))
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out.extend(labels);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::types::{Author, Label};
    use chrono::Utc;

    fn issue(title: &str, labels: &[&str]) -> Issue {
        Issue {
            id: 1,
            number: 1,
            title: title.to_string(),
            body: String::new(),
            labels: labels
                .iter()
                .enumerate()
                .map(|(i, name)| Label {
                    id: i as u64,
                    name: name.to_string(),
                    color: "ededed".to_string(),
                })
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            html_url: String::new(),
            author: Author {
                login: "alice".to_string(),
                avatar_url: String::new(),
                html_url: String::new(),
            },
            comments: 0,
            classification: classify(title),
        }
    }

    #[test]
    fn counts_cover_sentinel_builtins_and_labels() {
        let issues = vec![
            issue("开源自荐:工具箱", &["weekly"]),
            issue("工具推荐:笔记", &["weekly", "2025"]),
            issue("普通反馈", &[]),
        ];
        let map = recompute(&issues);

        assert_eq!(map[ALL], 3);
        assert_eq!(map[OPEN_SOURCE], 1);
        assert_eq!(map[TOOL], 1);
        assert_eq!(map[WEBSITE], 0);
        assert_eq!(map[ARTICLE], 0);
        assert_eq!(map["weekly"], 2);
        assert_eq!(map["2025"], 1);
    }

    #[test]
    fn reserved_labels_are_skipped() {
        let issues = vec![issue("普通反馈", &["issue-pending", "good"])];
        let map = recompute(&issues);

        assert!(!map.contains_key("issue-pending"));
        assert_eq!(map["good"], 1);
    }

    #[test]
    fn recompute_starts_from_zero_each_time() {
        let first = vec![issue("网站自荐", &["old"])];
        let second = vec![issue("普通", &[])];

        let map = recompute(&first);
        assert_eq!(map[WEBSITE], 1);

        let map = recompute(&second);
        assert_eq!(map[WEBSITE], 0);
        assert!(!map.contains_key("old"));
    }

    #[test]
    fn ordered_puts_labels_after_builtins_by_count() {
        let issues = vec![
            issue("普通一", &["rare"]),
            issue("普通二", &["common"]),
            issue("普通三", &["common"]),
            issue("普通四", &["also-rare"]),
        ];
        let order = ordered(&recompute(&issues));
        let names: Vec<&str> = order.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                ALL,
                OPEN_SOURCE,
                TOOL,
                WEBSITE,
                ARTICLE,
                "common",
                "also-rare",
                "rare",
            ]
        );
        assert_eq!(order[0].1, 4);
        assert_eq!(order[5].1, 2);
    }

    #[test]
    fn empty_collection_still_lists_builtins() {
        let order = ordered(&recompute(&[]));
        assert_eq!(order.len(), 5);
        assert!(order.iter().all(|(_, count)| *count == 0));
    }
}
