pub mod block_store;
pub mod clipboard;
pub mod persistence;
pub mod selection;
pub mod undo;

pub use block_store::{BlockStore, FIND_TOLERANCE};
pub use clipboard::{Clipboard, ClipboardBlock};
pub use persistence::{load_project, parse_project, save_project, ProjectError};
pub use selection::Selection;
pub use undo::History;
