use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::categories;
use crate::classify;
use crate::config::Config;
use crate::error::{Result, ToudiError};
use crate::source::{IssueSource, Page};
use crate::types::{Author, Issue, Label};

/// Fixed page size of the listing endpoint. A page shorter than this is
/// the last one.
pub const PER_PAGE: u32 = 100;

const ACCEPT: &str = "application/vnd.github.v3+json";

pub struct GitHub {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("api_base", &self.api_base)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl GitHub {
    pub fn new(config: &Config, token: Option<String>) -> Result<Self> {
        let (owner, repo) = config.split_repo()?;
        let client = Client::builder()
            .user_agent(concat!("toudi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToudiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.api_base, self.owner, self.repo)
    }
}

#[async_trait]
impl IssueSource for GitHub {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        let per_page = PER_PAGE.to_string();
        let page_number = page.to_string();
        let mut request = self
            .client
            .get(self.issues_url())
            .header("Accept", ACCEPT)
            .query(&[
                ("state", "open"),
                ("per_page", per_page.as_str()),
                ("page", page_number.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToudiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_failure(status, response.headers()));
        }

        let rate_remaining = header_u64(response.headers(), "x-ratelimit-remaining");
        if let Some(remaining) = rate_remaining {
            tracing::debug!(remaining, page, "fetched issue page");
        }

        let raw: Vec<GhIssue> = response
            .json()
            .await
            .map_err(|e| ToudiError::Transport(e.to_string()))?;

        Ok(Page {
            exhausted: page_exhausted(raw.len()),
            issues: raw.into_iter().map(convert_issue).collect(),
            rate_remaining,
        })
    }
}

/// Map a non-success response to the error taxonomy. A 403 only counts as
/// rate limiting when the quota header says zero; any other 403 stays a
/// plain status error.
fn classify_failure(status: StatusCode, headers: &HeaderMap) -> ToudiError {
    if status == StatusCode::FORBIDDEN && header_str(headers, "x-ratelimit-remaining") == Some("0")
    {
        let secs = header_str(headers, "x-ratelimit-reset")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        let reset =
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or(chrono::DateTime::UNIX_EPOCH);
        return ToudiError::RateLimited { reset };
    }
    if status == StatusCode::UNAUTHORIZED {
        return ToudiError::Unauthorized;
    }
    ToudiError::Status(status.as_u16())
}

fn page_exhausted(len: usize) -> bool {
    len < PER_PAGE as usize
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    header_str(headers, name).and_then(|v| v.parse().ok())
}

/// Web page on the tracker for a category: label categories map to a
/// label-qualified issue search, built-ins to a title search, 全部 to the
/// plain issue list.
pub fn category_web_url(repo: &str, category: &str) -> String {
    if category == categories::ALL {
        return format!("https://github.com/{}/issues", repo);
    }
    let query = if categories::BUILT_IN.contains(&category) {
        format!("is:issue is:open in:title {}", category)
    } else {
        format!("is:issue is:open label:\"{}\"", category)
    };
    format!(
        "https://github.com/{}/issues?q={}",
        repo,
        urlencoding::encode(&query)
    )
}

// GitHub API response types

#[derive(Deserialize)]
struct GhIssue {
    id: u64,
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<GhLabel>,
    user: Option<GhUser>,
    comments: Option<u64>,
    html_url: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Deserialize)]
struct GhLabel {
    id: Option<u64>,
    name: String,
    color: Option<String>,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
    avatar_url: Option<String>,
    html_url: Option<String>,
}

fn parse_datetime(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now())
}

fn parse_optional_datetime(s: Option<&str>) -> chrono::DateTime<chrono::Utc> {
    s.map(parse_datetime).unwrap_or_else(chrono::Utc::now)
}

fn convert_issue(raw: GhIssue) -> Issue {
    let classification = classify::classify(&raw.title);
    Issue {
        id: raw.id,
        number: raw.number,
        body: raw.body.unwrap_or_default(),
        labels: raw
            .labels
            .into_iter()
            .map(|l| Label {
                id: l.id.unwrap_or(0),
                name: l.name,
                color: l.color.unwrap_or_default(),
            })
            .collect(),
        created_at: parse_optional_datetime(raw.created_at.as_deref()),
        updated_at: parse_optional_datetime(raw.updated_at.as_deref()),
        html_url: raw.html_url.unwrap_or_default(),
        author: raw
            .user
            .map(|u| Author {
                login: u.login,
                avatar_url: u.avatar_url.unwrap_or_default(),
                html_url: u.html_url.unwrap_or_default(),
            })
            .unwrap_or_else(|| Author {
                login: "ghost".to_string(),
                avatar_url: String::new(),
                html_url: String::new(),
            }),
        comments: raw.comments.unwrap_or(0),
        title: raw.title,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn forbidden_with_exhausted_quota_is_rate_limited() {
        let err = classify_failure(
            StatusCode::FORBIDDEN,
            &headers(&[
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1700000000"),
            ]),
        );
        let message = err.to_string();
        assert!(message.contains("rate limit"), "got: {message}");
        assert!(message.contains("2023-11-14 22:13:20 UTC"), "got: {message}");
    }

    #[test]
    fn forbidden_with_quota_left_is_a_plain_status_error() {
        let err = classify_failure(
            StatusCode::FORBIDDEN,
            &headers(&[("x-ratelimit-remaining", "37")]),
        );
        assert!(matches!(err, ToudiError::Status(403)));
    }

    #[test]
    fn missing_reset_header_falls_back_to_the_epoch() {
        let err = classify_failure(
            StatusCode::FORBIDDEN,
            &headers(&[("x-ratelimit-remaining", "0")]),
        );
        assert!(err.to_string().contains("1970-01-01 00:00:00 UTC"));
    }

    #[test]
    fn unauthorized_maps_to_its_own_variant() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, &headers(&[]));
        assert!(matches!(err, ToudiError::Unauthorized));
    }

    #[test]
    fn other_statuses_keep_their_code() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, &headers(&[]));
        assert!(matches!(err, ToudiError::Status(502)));
    }

    #[test]
    fn short_pages_end_the_listing() {
        assert!(page_exhausted(0));
        assert!(page_exhausted(42));
        assert!(page_exhausted(99));
        assert!(!page_exhausted(100));
    }

    #[test]
    fn issues_parse_and_classify_from_wire_json() {
        let json = r#"[
            {
                "id": 9001,
                "number": 4321,
                "title": "开源自荐:一个终端看板",
                "body": "用 Rust 写的",
                "labels": [{"id": 7, "name": "weekly", "color": "0e8a16"}],
                "user": {"login": "alice", "avatar_url": "https://a.test/alice.png", "html_url": "https://github.com/alice"},
                "comments": 3,
                "html_url": "https://github.com/ruanyf/weekly/issues/4321",
                "created_at": "2025-03-01T08:30:00Z",
                "updated_at": "2025-03-02T09:00:00Z"
            }
        ]"#;
        let raw: Vec<GhIssue> = serde_json::from_str(json).unwrap();
        let issues: Vec<Issue> = raw.into_iter().map(convert_issue).collect();

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.id, 9001);
        assert_eq!(issue.number, 4321);
        assert!(issue.classification.open_source);
        assert!(!issue.classification.tool);
        assert_eq!(issue.labels.len(), 1);
        assert_eq!(issue.labels[0].name, "weekly");
        assert_eq!(issue.author.login, "alice");
        assert_eq!(issue.author.avatar_url, "https://a.test/alice.png");
        assert_eq!(issue.created_at.to_rfc3339(), "2025-03-01T08:30:00+00:00");
    }

    #[test]
    fn sparse_issue_json_fills_defaults() {
        let json = r#"[{"id": 1, "number": 2, "title": "一条反馈"}]"#;
        let raw: Vec<GhIssue> = serde_json::from_str(json).unwrap();
        let issue = convert_issue(raw.into_iter().next().unwrap());

        assert_eq!(issue.body, "");
        assert!(issue.labels.is_empty());
        assert_eq!(issue.author.login, "ghost");
        assert_eq!(issue.comments, 0);
    }

    #[test]
    fn category_urls_escape_their_queries() {
        assert_eq!(
            category_web_url("ruanyf/weekly", categories::ALL),
            "https://github.com/ruanyf/weekly/issues"
        );
        let url = category_web_url("ruanyf/weekly", categories::TOOL);
        assert!(url.starts_with("https://github.com/ruanyf/weekly/issues?q="));
        assert!(url.contains("in%3Atitle"));
        assert!(!url.contains(' '));

        let url = category_web_url("ruanyf/weekly", "help wanted");
        assert!(url.contains("label%3A%22help%20wanted%22"));
    }
}
