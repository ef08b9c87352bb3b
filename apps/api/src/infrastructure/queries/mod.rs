// Read-side query services

pub mod member_query_service;

pub use member_query_service::MemberQueryService;
