//! View-synchronization layer for an outline panel: mirrors a live document's
//! node tree into lazily created view nodes that carry expansion, filter and
//! drag-and-drop state without touching the document itself.

pub mod config;
pub mod util;

pub mod model;
