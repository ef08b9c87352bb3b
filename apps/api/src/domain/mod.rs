// Domain layer module exports
// Domain is independent of infrastructure concerns

pub mod errors;
pub mod member;
pub mod paging;
pub mod repositories;
pub mod team;
