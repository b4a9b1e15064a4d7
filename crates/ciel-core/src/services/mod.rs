pub mod browse_service;
pub mod import_service;
pub mod status;

pub use browse_service::{BrowseService, SongHistory};
pub use import_service::{ImportReport, ImportService};
pub use status::{ImportStatus, StatusKind};
