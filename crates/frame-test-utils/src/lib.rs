//! Shared test utilities for the frame-sync workspace.
//!
//! This crate provides photo-tree fixtures so crate test suites do not each
//! rebuild directory layouts by hand. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`tree`]: [`PhotoTree`] builder for source trees, sidecars and mtimes

pub mod tree;

pub use tree::PhotoTree;
