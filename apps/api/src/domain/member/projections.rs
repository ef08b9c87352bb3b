use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Member;
use crate::domain::team::Team;

/// Username and age of a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            username: member.username().map(str::to_string),
            age: member.age(),
        }
    }
}

/// Member joined with the name of its team
///
/// Team columns are empty for members without a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: Uuid,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
}

/// A member loaded together with its team in a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

impl MemberWithTeam {
    /// Returns true when the team association was loaded
    pub fn is_team_loaded(&self) -> bool {
        self.team.is_some()
    }
}

/// Aggregate figures over members' ages
///
/// Everything except `count` is `None` when no rows were aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AgeStatistics {
    pub count: i64,
    pub sum: Option<i64>,
    pub avg: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

/// Average member age for one team
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TeamAverageAge {
    pub team_name: String,
    pub average_age: f64,
}
