//! View-model projections of the task document.
//!
//! Projections are pure functions: no I/O, no retained state.

pub mod tree;
