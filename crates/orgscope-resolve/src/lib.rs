//! Ancestor resolution over tenant-scoped node stores.
//!
//! This crate owns tenant ownership decisions: every query takes the
//! caller's tenant as an argument and checks the resolved root against it.
//! Storage lives in `orgscope-store`; pure hierarchy data in
//! `orgscope-kernel`.

mod resolver;
mod service;

pub use resolver::{AncestorChain, AncestorResolver};
pub use service::HierarchyService;
