use chrono::{DateTime, Utc};

/// Clock port - the single source of "now".
///
/// Every policy decision takes one clock reading per request, so a post's
/// visibility cannot flip halfway through handling it. Tests pin the
/// reading instead of sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
