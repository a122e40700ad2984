//! # orgscope-store
//!
//! Storage layer for hierarchy rows.
//!
//! This crate provides:
//! - JSONL read/write of company and node rows (portable persistence)
//! - `MemoryStore` (canonical in-memory index keyed by level and id)
//! - `NodeSource`, the async lookup boundary the resolver consumes
//!
//! It does not decide tenant ownership. That belongs to `orgscope-resolve`.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one row per line)
//!     ↕  load / save
//! MemoryStore (deterministic in-memory index)
//!     ↓  NodeSource
//! resolver
//! ```

pub mod jsonl;
pub mod memory;
pub mod source;

pub use jsonl::{JsonlError, parse_rows, read_rows_from_path, render_rows, write_rows_to_path};
pub use memory::{DanglingParent, MemoryStore, MemoryStoreError};
pub use source::NodeSource;
