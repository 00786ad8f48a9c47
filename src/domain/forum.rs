//! Forum domain types and input validation.
//!
//! Validation here runs strictly before any network call: a draft that
//! fails these checks never reaches the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CommentId, PostId, UserId};
use crate::error::ValidationError;

/// Minimum title length for a post, in characters.
pub const TITLE_MIN_CHARS: usize = 3;
/// Minimum content length for a post, in characters.
pub const CONTENT_MIN_CHARS: usize = 10;

/// Post category. Stored as a lowercase string column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    #[default]
    General,
    Programming,
    Design,
    Questions,
    Announcements,
    Achievement,
}

impl PostCategory {
    pub const ALL: [PostCategory; 6] = [
        PostCategory::General,
        PostCategory::Programming,
        PostCategory::Design,
        PostCategory::Questions,
        PostCategory::Announcements,
        PostCategory::Achievement,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PostCategory::General => "general",
            PostCategory::Programming => "programming",
            PostCategory::Design => "design",
            PostCategory::Questions => "questions",
            PostCategory::Announcements => "announcements",
            PostCategory::Achievement => "achievement",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A forum post row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// A comment row, referencing its post and author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumComment {
    pub id: CommentId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub post_id: PostId,
    pub user_id: UserId,
}

/// A like row. Existence implies "liked"; at most one per (post, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPostLike {
    pub post_id: PostId,
    pub user_id: UserId,
}

/// Insert payload for a new post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Insert payload for a new comment.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
    pub post_id: PostId,
    pub user_id: UserId,
}

/// An unvalidated post draft as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
}

impl PostDraft {
    /// Validate and normalize the draft into an insert payload.
    ///
    /// Whitespace is trimmed first; length minimums apply to the
    /// trimmed text.
    pub fn into_new_post(self, author: &UserId) -> Result<NewPost, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();

        if title.chars().count() < TITLE_MIN_CHARS {
            return Err(ValidationError::TitleTooShort {
                min: TITLE_MIN_CHARS,
            });
        }
        if content.chars().count() < CONTENT_MIN_CHARS {
            return Err(ValidationError::ContentTooShort {
                min: CONTENT_MIN_CHARS,
            });
        }

        Ok(NewPost {
            title: title.to_string(),
            content: content.to_string(),
            category: self.category,
            user_id: author.clone(),
            image_url: None,
        })
    }
}

/// An image attachment as raw bytes plus declared metadata.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Reject anything that is not a reasonably small image.
    pub fn validate(&self, max_bytes: u64) -> Result<(), ValidationError> {
        if !self.mime.starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                mime: self.mime.clone(),
            });
        }
        let size = self.bytes.len() as u64;
        if size > max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: max_bytes,
            });
        }
        Ok(())
    }

    /// File extension from the declared name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.file_name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

/// Validate comment text before submission.
pub fn validate_comment(content: &str) -> Result<&str, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> UserId {
        UserId::new("user-1")
    }

    #[test]
    fn draft_with_two_char_title_is_rejected() {
        let draft = PostDraft {
            title: "ab".into(),
            content: "long enough content".into(),
            category: PostCategory::General,
        };
        assert_eq!(
            draft.into_new_post(&author()),
            Err(ValidationError::TitleTooShort { min: 3 })
        );
    }

    #[test]
    fn draft_with_short_content_is_rejected() {
        let draft = PostDraft {
            title: "valid title".into(),
            content: "too short".into(),
            category: PostCategory::General,
        };
        // 9 chars after trim
        assert_eq!(
            draft.into_new_post(&author()),
            Err(ValidationError::ContentTooShort { min: 10 })
        );
    }

    #[test]
    fn draft_is_trimmed_before_length_check() {
        let draft = PostDraft {
            title: "  ab  ".into(),
            content: "          padded          ".into(),
            category: PostCategory::General,
        };
        assert!(matches!(
            draft.into_new_post(&author()),
            Err(ValidationError::TitleTooShort { .. })
        ));
    }

    #[test]
    fn valid_draft_becomes_insert_payload() {
        let draft = PostDraft {
            title: " My first post ".into(),
            content: "hello forum, this is fine".into(),
            category: PostCategory::Questions,
        };
        let new = draft.into_new_post(&author()).unwrap();
        assert_eq!(new.title, "My first post");
        assert_eq!(new.category, PostCategory::Questions);
        assert!(new.image_url.is_none());
    }

    #[test]
    fn non_image_mime_is_rejected() {
        let file = ImageAttachment {
            file_name: "notes.pdf".into(),
            mime: "application/pdf".into(),
            bytes: vec![0; 16],
        };
        assert!(matches!(
            file.validate(1024),
            Err(ValidationError::NotAnImage { .. })
        ));
    }

    #[test]
    fn oversized_image_is_rejected() {
        let file = ImageAttachment {
            file_name: "big.png".into(),
            mime: "image/png".into(),
            bytes: vec![0; 32],
        };
        assert_eq!(
            file.validate(16),
            Err(ValidationError::FileTooLarge { size: 32, max: 16 })
        );
    }

    #[test]
    fn image_under_limit_passes() {
        let file = ImageAttachment {
            file_name: "ok.jpg".into(),
            mime: "image/jpeg".into(),
            bytes: vec![0; 16],
        };
        assert!(file.validate(16).is_ok());
        assert_eq!(file.extension(), Some("jpg"));
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in PostCategory::ALL {
            assert_eq!(category.as_str().parse::<PostCategory>(), Ok(category));
        }
        assert!("gaming".parse::<PostCategory>().is_err());
    }

    #[test]
    fn comment_validation_trims_and_rejects_empty() {
        assert_eq!(validate_comment("  hola  "), Ok("hola"));
        assert_eq!(validate_comment("   "), Err(ValidationError::EmptyComment));
    }
}
