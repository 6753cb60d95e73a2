//! Domain Value Objects
//!
//! Immutable value types for the board domain: the feed filter and the
//! validated post / comment inputs.

use derive_more::Display;

use crate::error::{BoardError, BoardResult};

pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 100;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_URL_CHARS: usize = 2048;
pub const MAX_POST_BODY_CHARS: usize = 10_000;
pub const MAX_COMMENT_CHARS: usize = 2_000;

/// Feed ordering. Each key maps to a fixed ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum SortKey {
    #[default]
    #[display("newest")]
    Newest,
    #[display("most_voted")]
    MostVoted,
    #[display("most_commented")]
    MostCommented,
}

impl SortKey {
    /// Lenient parse. Anything unrecognised is `Newest`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "most_voted" | "votes" | "popular" => SortKey::MostVoted,
            "most_commented" | "comments" => SortKey::MostCommented,
            _ => SortKey::Newest,
        }
    }

    /// ORDER BY clause over the `p` alias. Ties fall back to recency, then id.
    pub fn order_by_clause(&self) -> &'static str {
        match self {
            SortKey::Newest => "p.created_at DESC, p.post_id DESC",
            SortKey::MostVoted => "p.vote_count DESC, p.created_at DESC, p.post_id DESC",
            SortKey::MostCommented => "p.comment_count DESC, p.created_at DESC, p.post_id DESC",
        }
    }
}

/// Trimmed free-text query. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `%query%` for ILIKE with `\`, `%` and `_` escaped, or `None` for match-all
    pub fn like_pattern(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }

    /// Case-insensitive substring match against title or body
    pub fn matches(&self, title: &str, body: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        let needle = self.0.to_lowercase();
        title.to_lowercase().contains(&needle) || body.to_lowercase().contains(&needle)
    }
}

/// Feed request after parsing. Page and size are not yet clamped to the
/// result set; see [`crate::domain::pagination::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub query: SearchQuery,
    pub page: i64,
    pub page_size: i64,
    pub sort: SortKey,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            query: SearchQuery::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortKey::Newest,
        }
    }
}

impl Filter {
    pub fn new(query: &str, page: i64, page_size: i64, sort: SortKey) -> Self {
        Self {
            query: SearchQuery::new(query),
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            sort,
        }
    }

    /// Build from raw query-string values. Never fails; missing or
    /// non-numeric numbers fall back to page 1 / `DEFAULT_PAGE_SIZE`.
    pub fn from_raw(
        q: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
        order_by: Option<&str>,
    ) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let page_size = page_size
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let sort = order_by.map(SortKey::parse).unwrap_or_default();

        Self::new(q.unwrap_or_default(), page, page_size, sort)
    }
}

/// Validated post content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub url: Option<String>,
    pub body: String,
}

impl PostContent {
    pub fn new(title: &str, url: Option<&str>, body: &str) -> BoardResult<Self> {
        let title = title.trim();
        let title_len = title.chars().count();
        if title_len == 0 {
            return Err(BoardError::Validation("Title is required".to_string()));
        }
        if title_len > MAX_TITLE_CHARS {
            return Err(BoardError::Validation(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        if title.chars().any(char::is_control) {
            return Err(BoardError::Validation(
                "Title contains invalid characters".to_string(),
            ));
        }

        let url = match url.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(validate_url(raw)?),
        };

        if body.chars().count() > MAX_POST_BODY_CHARS {
            return Err(BoardError::Validation(format!(
                "Body must be at most {MAX_POST_BODY_CHARS} characters"
            )));
        }

        Ok(Self {
            title: title.to_string(),
            url,
            body: body.to_string(),
        })
    }
}

fn validate_url(raw: &str) -> BoardResult<String> {
    let invalid = || BoardError::Validation("URL must be an http or https link".to_string());

    if raw.len() > MAX_URL_CHARS || raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }

    let lower = raw.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .ok_or_else(invalid)?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(invalid());
    }

    Ok(raw.to_string())
}

/// Validated comment text
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(raw: &str) -> BoardResult<Self> {
        let body = raw.trim();
        let len = body.chars().count();
        if len == 0 {
            return Err(BoardError::Validation("Comment is required".to_string()));
        }
        if len > MAX_COMMENT_CHARS {
            return Err(BoardError::Validation(format!(
                "Comment must be at most {MAX_COMMENT_CHARS} characters"
            )));
        }
        Ok(Self(body.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
