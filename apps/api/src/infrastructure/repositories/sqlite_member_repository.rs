use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::{Member, MemberSearchCondition, MemberTeamDto};
use crate::domain::repositories::MemberRepository;
use crate::infrastructure::database::MemberRow;

/// Projection shared by every member-with-team-name query
pub(crate) const MEMBER_TEAM_SELECT: &str = r#"
    SELECT
        m.id AS member_id, m.username, m.age,
        t.id AS team_id, t.name AS team_name
    FROM members m
    LEFT JOIN teams t ON m.team_id = t.id"#;

/// SQLite implementation of MemberRepository
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    /// Creates a new SqliteMemberRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn save(&self, member: &Member) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO members (id, username, age, team_id)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                username = excluded.username,
                age = excluded.age,
                team_id = excluded.team_id
            "#,
        )
        .bind(member.id())
        .bind(member.username())
        .bind(member.age())
        .bind(member.team_id())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            ORDER BY username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Vec<MemberTeamDto>> {
        let mut builder = QueryBuilder::<Sqlite>::new(MEMBER_TEAM_SELECT);
        condition.push_where(&mut builder);
        builder.push(" ORDER BY m.username ASC NULLS LAST, m.age ASC");

        tracing::debug!(sql = builder.sql(), "searching members");

        let rows = builder
            .build_query_as::<MemberTeamDto>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM members WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Member {}", id)));
        }

        Ok(())
    }
}
