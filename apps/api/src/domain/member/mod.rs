// Member domain module
// Contains the member entity, its read-side projections and search filters

#![allow(clippy::module_inception)]

pub mod member;
pub mod projections;
pub mod search;

pub use member::Member;
pub use projections::{AgeStatistics, MemberDto, MemberTeamDto, MemberWithTeam, TeamAverageAge};
pub use search::{MemberSearchCondition, SearchPredicate};
