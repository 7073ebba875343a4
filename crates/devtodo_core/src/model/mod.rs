//! Domain model for categorized to-do notes.
//!
//! # Responsibility
//! - Define the task record and the fixed category set.
//! - Own the in-memory document shape and its pure mutations.
//!
//! # Invariants
//! - A document always carries all four fixed categories.
//! - Every record is identified by a stable `TaskId`.
//! - Insertion order within a category is display order.

pub mod document;
pub mod task;
