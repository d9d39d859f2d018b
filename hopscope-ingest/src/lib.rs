pub mod chrome_time;
pub mod csv;
pub mod domain;
pub mod error;
pub mod history;
pub mod loader;

pub use domain::extract_domain;
pub use error::{IngestError, Result};
pub use loader::{IngestStats, InputKind, load_visits};
