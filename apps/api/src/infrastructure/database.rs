use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;
use crate::domain::team::Team;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens a pool against `database_url`
pub async fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<SqlitePool> {
    tracing::info!("Connecting to database...");
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    tracing::info!("Database connected successfully");
    Ok(pool)
}

/// Opens a private in-memory database with the schema applied
///
/// The pool holds exactly one connection that never expires; every
/// connection to `sqlite::memory:` would otherwise see its own database.
pub async fn connect_in_memory() -> RepositoryResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Applies pending schema migrations
pub async fn migrate(pool: &SqlitePool) -> RepositoryResult<()> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Schema migrations applied");
    Ok(())
}

/// Row shape of the `members` table
#[derive(Debug, FromRow)]
pub struct MemberRow {
    pub id: Uuid,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<Uuid>,
}

impl From<MemberRow> for Member {
    fn from(r: MemberRow) -> Self {
        Member::from_persistence(r.id, r.username, r.age, r.team_id)
    }
}

/// Row shape of the `teams` table
#[derive(Debug, FromRow)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team::from_persistence(r.id, r.name)
    }
}
