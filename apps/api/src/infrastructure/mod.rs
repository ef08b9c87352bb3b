// Infrastructure layer module
// Contains database adapters and read-side query services

pub mod database;
pub mod queries;
pub mod repositories;
pub mod seed;
