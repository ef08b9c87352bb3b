use sqlx::SqlitePool;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::domain::team::Team;
use crate::infrastructure::repositories::{SqliteMemberRepository, SqliteTeamRepository};

/// Number of members created by [`seed_sample_data`]
pub const SAMPLE_MEMBER_COUNT: i32 = 100;

/// Populates an empty database with `teamA`, `teamB` and `member0..member99`
///
/// Member `i` is `i` years old and joins `teamA` when `i` is even, `teamB`
/// otherwise. Nothing is written if any team already exists.
pub async fn seed_sample_data(pool: &SqlitePool) -> RepositoryResult<bool> {
    let team_repo = SqliteTeamRepository::new(pool.clone());
    if !team_repo.find_all().await?.is_empty() {
        tracing::info!("Database already populated, skipping sample data");
        return Ok(false);
    }

    let team_a = Team::new("teamA");
    let team_b = Team::new("teamB");
    team_repo.save(&team_a).await?;
    team_repo.save(&team_b).await?;

    let member_repo = SqliteMemberRepository::new(pool.clone());
    for i in 0..SAMPLE_MEMBER_COUNT {
        let team = if i % 2 == 0 { &team_a } else { &team_b };
        let member = Member::new(Some(format!("member{}", i)), i, Some(team));
        member_repo.save(&member).await?;
    }

    tracing::info!(members = SAMPLE_MEMBER_COUNT, "Sample data created");
    Ok(true)
}
