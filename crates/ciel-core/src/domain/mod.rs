pub mod event;
pub mod ids;
pub mod setlist;
pub mod song;

pub use event::{Event, EventDetail, EventSummary, NewEvent};
pub use ids::{EventId, SetlistEntryId, SongId};
pub use setlist::{ItemKind, NewSetlistEntry, SetlistEntry, SetlistItem, SongAppearance};
pub use song::{Song, SongRef};
