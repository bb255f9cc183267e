//! Client-side task list core kept in sync with a remote `/tasks` collection.
//!
//! # Examples
//!
//! Direct use of [`core::store::TaskStore`] and [`edit::EditController`]:
//! ```
//! use std::sync::Arc;
//!
//! use todosync::{
//!     core::store::TaskStore,
//!     edit::EditController,
//!     remote::memory::MemoryRemote,
//!     task::{SubmitIntent, TaskField},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let remote = Arc::new(MemoryRemote::new());
//! let mut store = TaskStore::init(remote).await;
//!
//! store.set_draft_field(TaskField::Title, "Pay bills");
//! store.set_draft_field(TaskField::Priority, "high");
//! let created = store.submit_draft(SubmitIntent::default()).await.expect("create");
//! assert_eq!(store.len(), 1);
//! assert!(store.draft().is_empty());
//!
//! let mut editor = EditController::new();
//! editor.start_edit(&created);
//! editor.set_field(TaskField::Title, "Pay all bills").expect("edit");
//! editor.save(&mut store, SubmitIntent::default()).await.expect("save");
//! assert_eq!(store.tasks()[0].title, "Pay all bills");
//! # }
//! ```
//!
//! Runtime usage against an HTTP server:
//! ```no_run
//! use std::sync::Arc;
//!
//! use todosync::{
//!     config::{RemoteConfig, RuntimeConfig},
//!     core::store::TaskStore,
//!     remote::http::HttpTaskRemote,
//!     runtime::handle::spawn_task_list,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let remote = Arc::new(HttpTaskRemote::new(&RemoteConfig::from_env()));
//! let handle = spawn_task_list(TaskStore::new(remote), RuntimeConfig::default());
//! let _ = handle.toggle_completed("1").await;
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![warn(missing_docs)]

/// Remote endpoint and runtime configuration.
pub mod config;
/// Local collection store.
pub mod core;
/// Inline edit state machine.
pub mod edit;
/// Remote operation table.
pub mod op;
/// Client seam for the remote collection resource and its implementations.
pub mod remote;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Task records, drafts and form intents.
pub mod task;
/// Shared primitive types and option sets.
pub mod types;
