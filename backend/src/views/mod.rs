//! Vistas de texto sobre los modelos de lectura.
//!
//! Cada vista depende sólo de su estado explícito y de los datos que recibe;
//! nada aquí toca el almacenamiento.

pub mod calendar;
pub mod event_list;
pub mod format;
pub mod song_catalogue;
pub mod status;

pub use calendar::{CalendarLayout, CalendarView};
pub use event_list::EventListView;
