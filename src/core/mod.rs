//! Core of the versioned record store: git backend, tree-listing parser,
//! path/layout resolution, and the record CRUD surface.

pub mod bag;
pub mod config;
pub mod error;
pub mod fs_adapter;
pub mod journal;
pub mod repo;
pub mod store;
pub mod tree;
