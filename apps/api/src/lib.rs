//! Member/Team query library
//!
//! Entities, repositories and read-side queries over a two-table schema
//! (members belonging to teams), plus a small HTTP API for searching members.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
