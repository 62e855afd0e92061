//! Listing filters - the queries the store runs on behalf of a viewer.

use uuid::Uuid;

/// Fixed page size for post listings.
pub const PAGE_SIZE: u64 = 20;

/// Requested listing scope.
///
/// Everything except `Published` lists a single author's own posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Published,
    Draft,
    Scheduled,
    Deleted,
}

impl StatusFilter {
    /// Parse a raw `status` query value. Unknown values fall back to the
    /// public listing rather than erroring.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "draft" => StatusFilter::Draft,
            "scheduled" => StatusFilter::Scheduled,
            "deleted" => StatusFilter::Deleted,
            _ => StatusFilter::Published,
        }
    }

    /// Whether this scope only makes sense for a known viewer.
    pub fn requires_viewer(self) -> bool {
        !matches!(self, StatusFilter::Published)
    }
}

/// A fully-specified listing request.
///
/// Ordering is fixed: newest first by `created_at`, ties broken by `id`
/// descending so pages are deterministic.
#[derive(Debug, Clone, Copy)]
pub struct PostQuery {
    pub status: StatusFilter,
    pub viewer: Option<Uuid>,
    pub page: u64,
}

impl PostQuery {
    pub fn new(status: StatusFilter, viewer: Option<Uuid>, page: u64) -> Self {
        Self {
            status,
            viewer,
            page: page.max(1),
        }
    }

    /// The author the results must be scoped to, if the filter is an
    /// owner-only scope.
    pub fn author_scope(&self) -> Option<Uuid> {
        if self.status.requires_viewer() {
            self.viewer
        } else {
            None
        }
    }

    /// An owner-only scope with no known viewer matches nothing. The store
    /// short-circuits to an empty page instead of treating it as an error.
    pub fn is_satisfiable(&self) -> bool {
        !(self.status.requires_viewer() && self.viewer.is_none())
    }
}
