//! # justly-core
//!
//! Editing core for the Justly score editor: the document tree, reversible
//! commands and their log, JSON validation and the clipboard, independent of
//! any front end.
//!
//! ```rust,ignore
//! use justly_core::config::Config;
//! use justly_core::state::{EditorState, RowsParent};
//! use justly_core::action::EditAction;
//! use justly_core::dispatch::dispatch_action;
//!
//! let config = Config::load();
//! let mut state = EditorState::from_config(&config);
//! let action = EditAction::InsertRows { parent: RowsParent::Song, first_row: 0, count: 4 };
//! let result = dispatch_action(&action, &mut state);
//! // result.changes lists the model notifications; result.status any errors
//! ```
//!
//! ## Module Overview
//!
//! - [`state`] — `Document`, `Command`, `CommandLog`, clipboard, persistence
//!   and `EditorState`, which ties them together
//! - [`action`] — `EditAction` and `DispatchResult`
//! - [`dispatch`] — `dispatch_action()`, the entry point for front ends
//! - [`config`] — TOML configuration (embedded defaults + user override)

pub mod action;
pub mod config;
pub mod dispatch;
pub mod state;

pub use justly_types as types;
