//! Pages: titled text documents owned by exactly one user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::user::UserId;

/// Longest page title accepted, in characters.
pub const PAGE_TITLE_MAX: usize = 200;

/// Validation errors for page identifiers and drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageValidationError {
    #[error("page id must be a positive integer")]
    InvalidId,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("content must not be empty")]
    EmptyContent,
}

impl PageValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent => "content",
        }
    }

    /// Machine-readable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_page_id",
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::EmptyContent => "empty_content",
        }
    }
}

/// Store-assigned page identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(i64);

impl PageId {
    /// Wrap a store identifier, rejecting zero and negative values.
    pub fn new(id: i64) -> Result<Self, PageValidationError> {
        if id <= 0 {
            return Err(PageValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl FromStr for PageId {
    type Err = PageValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse::<i64>()
            .map_err(|_| PageValidationError::InvalidId)?;
        Self::new(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated title and content for a create or update.
///
/// Titles are trimmed; content is stored verbatim but must contain
/// something other than whitespace.
///
/// # Examples
/// ```
/// use flowboard::domain::PageDraft;
///
/// let draft = PageDraft::try_from_parts("  Groceries ", "milk").unwrap();
/// assert_eq!(draft.title(), "Groceries");
/// assert!(PageDraft::try_from_parts("", "milk").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    title: String,
    content: String,
}

impl PageDraft {
    /// Validate raw title and content.
    pub fn try_from_parts(title: &str, content: &str) -> Result<Self, PageValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PageValidationError::EmptyTitle);
        }
        if title.chars().count() > PAGE_TITLE_MAX {
            return Err(PageValidationError::TitleTooLong {
                max: PAGE_TITLE_MAX,
            });
        }
        if content.trim().is_empty() {
            return Err(PageValidationError::EmptyContent);
        }
        Ok(Self {
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }

    /// Trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Page body.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// Stored page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Replace title and content. Ownership and creation time are kept.
    pub fn apply(&mut self, draft: PageDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.updated_at = now;
    }

    /// Whether `user` owns this page.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

/// Page data handed to the page store on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl NewPage {
    /// Stamp a draft with its owner and creation time.
    #[must_use]
    pub fn from_draft(draft: PageDraft, owner_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            owner_id,
            created_at: now,
        }
    }
}
