// Vedam library - lesson catalog, playback engine and the terminal front-end
// The engine and catalog build without a terminal; the TUI needs both `tui` and `audio`

pub mod audio; // playback sessions, transports, time formatting
pub mod catalog; // lesson index, manifests, resource locators
pub mod config; // settings and defaults
pub mod error; // library error types

#[cfg(all(feature = "tui", feature = "audio"))]
pub mod ui; // terminal interface

pub use audio::{LoopMode, PlaybackRate, PlaybackSession, SessionSnapshot, Transport};
pub use catalog::{Catalog, ContentSource, LessonConfig, LessonSummary, ResourceLocator};
pub use config::Config;
pub use error::{CatalogError, TransportError};
