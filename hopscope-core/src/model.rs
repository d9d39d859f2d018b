use serde::{Deserialize, Serialize};

/// A single page visit, already reduced to the domain that was visited.
///
/// `timestamp` is in microseconds since the Unix epoch. Vendor-specific
/// encodings are converted before a `Visit` is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub domain: String,
    pub timestamp: i64,
    pub title: String,
}

impl Visit {
    pub fn new(domain: impl Into<String>, timestamp: i64, title: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            timestamp,
            title: title.into(),
        }
    }
}
