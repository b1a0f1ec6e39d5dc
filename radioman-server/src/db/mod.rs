//! Database layer - store handle and repositories
//!
//! # Design Principles
//!
//! - One pooled handle, constructed at startup and passed to handlers
//! - Rely on DB constraints - no check-then-insert
//! - Post listing resolves authors with a LEFT JOIN (no N+1)

pub mod repos;
pub mod store;

pub use repos::{DbError, Post, PostRepo, User, UserRepo};
pub use store::{SqlValue, Store};
