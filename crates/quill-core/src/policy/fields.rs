//! Validation and field resolution for create/update requests.
//!
//! One function serves both paths so the draft/publication rules cannot
//! drift between them.

use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// Maximum accepted title length, in characters.
pub const TITLE_MAX_LEN: usize = 255;

/// Raw post fields as they arrive from a create or update request.
///
/// `is_draft` is optional: updates fall back to the post's current flag,
/// creates default to publishing immediately. `published_at` is the raw
/// request string; parsing it is part of validation.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub is_draft: Option<bool>,
    pub published_at: Option<String>,
}

/// The stored field set produced from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// Validate `input` and resolve it into the fields to persist.
///
/// `current_is_draft` is the post's existing flag on the update path and
/// `None` on create. Validation is atomic: every problem is collected and
/// the request is rejected whole, before any store mutation.
///
/// Resolution rules:
/// - effective draft flag: input value, else current value, else `false`;
/// - drafts never carry a publication timestamp;
/// - non-drafts keep the supplied timestamp, or fall back to `now` when
///   the request left it empty - so "publish" means "published as of now".
pub fn resolve_post_fields(
    input: &PostInput,
    current_is_draft: Option<bool>,
    now: DateTime<Utc>,
) -> Result<PostFields, DomainError> {
    let mut errors = Vec::new();

    let title = input.title.trim();
    if title.is_empty() {
        errors.push("title must not be empty".to_owned());
    } else if title.chars().count() > TITLE_MAX_LEN {
        errors.push(format!("title must be at most {TITLE_MAX_LEN} characters"));
    }

    if input.content.trim().is_empty() {
        errors.push("content must not be empty".to_owned());
    }

    let is_draft = input.is_draft.or(current_is_draft).unwrap_or(false);

    let explicit_published_at = match input.published_at.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match parse_timestamp(raw) {
            Ok(at) => Some(at),
            Err(message) => {
                errors.push(message);
                None
            }
        },
        _ => None,
    };

    if !errors.is_empty() {
        return Err(DomainError::Validation(errors));
    }

    let published_at = if is_draft {
        None
    } else {
        Some(explicit_published_at.unwrap_or(now))
    };

    Ok(PostFields {
        title: title.to_owned(),
        content: input.content.trim().to_owned(),
        is_draft,
        published_at,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| "published_at must be a valid RFC 3339 timestamp".to_owned())
}
