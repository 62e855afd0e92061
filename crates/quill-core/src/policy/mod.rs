//! Post lifecycle and visibility policy.
//!
//! Pure decision functions: every one is a function of a post snapshot, an
//! optional viewer identity and a clock reading, with no global state. The
//! HTTP layer threads `viewer` and `now` in; the store interprets the
//! queries built here.

mod fields;
mod filter;
mod visibility;

pub use fields::{PostFields, PostInput, TITLE_MAX_LEN, resolve_post_fields};
pub use filter::{PAGE_SIZE, PostQuery, StatusFilter};
pub use visibility::{Action, can_mutate, can_view};
