//! # chordline-core
//!
//! Editing engine for the Chordline sequencer: the block store, selection,
//! clipboard, undo history, pointer gestures, timeline extent and project
//! persistence, composed behind a single [`Editor`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chordline_audio::LogTrigger;
//! use chordline_core::config::Config;
//! use chordline_core::editor::Editor;
//! use chordline_types::EditorAction;
//!
//! let config = Config::load();
//! let redraw = || { /* repaint */ };
//! let mut editor = Editor::new(config.editor_settings(), &redraw, &LogTrigger);
//!
//! editor.dispatch(&EditorAction::PlaceToken("Am".into()));
//! editor.play();
//! // drive playback from the host's clock
//! // editor.tick(elapsed);
//! ```
//!
//! ## Module Overview
//!
//! - [`state`]: block store, selection, clipboard, undo history, JSON persistence
//! - [`geometry`]: beat/pixel mapping and hit-testing
//! - [`interaction`]: drag and resize gesture state machine
//! - [`viewport`]: scroll window and timeline growth
//! - [`editor`]: `Editor`, the owner of all of the above plus the playback scheduler
//! - [`dispatch`]: `Editor::dispatch`, the action entry point
//! - [`keymap`]: keyboard bindings to actions
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod config;
pub mod dispatch;
pub mod editor;
pub mod geometry;
pub mod interaction;
pub mod keymap;
pub mod state;
pub mod viewport;

pub use editor::{ContextMenu, DropOutcome, Editor, EditorSettings, Redraw};
pub use interaction::{CursorHint, PressOutcome};
