use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::{
    AgeStatistics, Member, MemberDto, MemberSearchCondition, MemberTeamDto, MemberWithTeam,
    TeamAverageAge,
};
use crate::domain::paging::{derive_total, Page, PageRequest, QueryResults};
use crate::domain::team::Team;
use crate::infrastructure::database::MemberRow;
use crate::infrastructure::repositories::sqlite_member_repository::MEMBER_TEAM_SELECT;

/// Member columns, with teams joined so team filters resolve
const MEMBER_SELECT: &str = r#"
    SELECT m.id AS id, m.username AS username, m.age AS age, m.team_id AS team_id
    FROM members m
    LEFT JOIN teams t ON m.team_id = t.id"#;

const MEMBER_COUNT: &str = r#"
    SELECT COUNT(*)
    FROM members m
    LEFT JOIN teams t ON m.team_id = t.id"#;

/// SQLite reads a negative LIMIT as "no limit"
fn clamp_window(offset: i64, limit: i64) -> (i64, i64) {
    (offset.max(0), limit.max(0))
}

/// Member row with its team's columns fetched in the same statement
#[derive(Debug, FromRow)]
struct MemberFetchJoinRow {
    id: Uuid,
    username: Option<String>,
    age: i32,
    team_id: Option<Uuid>,
    joined_team_id: Option<Uuid>,
    joined_team_name: Option<String>,
}

impl MemberFetchJoinRow {
    fn into_member_with_team(self) -> MemberWithTeam {
        let team = match (self.joined_team_id, self.joined_team_name) {
            (Some(id), Some(name)) => Some(Team::from_persistence(id, name)),
            _ => None,
        };
        MemberWithTeam {
            member: Member::from_persistence(self.id, self.username, self.age, self.team_id),
            team,
        }
    }
}

/// Read-side queries over members and teams
///
/// Each method runs one query shape (single-row fetches, paging, joins,
/// aggregation, subqueries, projections, bulk updates) against the pool.
#[derive(Clone)]
pub struct MemberQueryService {
    pool: SqlitePool,
}

impl MemberQueryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Result fetching =====

    /// Fetches the single member matching `condition`
    ///
    /// # Returns
    /// * `Ok(None)` - No member matches
    /// * `Err(RepositoryError::NonUniqueResult)` - More than one member matches
    pub async fn fetch_one(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Option<Member>> {
        let mut members = self.fetch(condition).await?;
        match members.len() {
            0 => Ok(None),
            1 => Ok(members.pop()),
            n => Err(RepositoryError::NonUniqueResult(n)),
        }
    }

    /// Fetches the first member matching `condition`, if any
    pub async fn fetch_first(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Option<Member>> {
        let mut builder = QueryBuilder::<Sqlite>::new(MEMBER_SELECT);
        condition.push_where(&mut builder);
        builder.push(" LIMIT 1");

        let row = builder
            .build_query_as::<MemberRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Member::from))
    }

    /// Fetches every member matching `condition`
    pub async fn fetch(&self, condition: &MemberSearchCondition) -> RepositoryResult<Vec<Member>> {
        let mut builder = QueryBuilder::<Sqlite>::new(MEMBER_SELECT);
        condition.push_where(&mut builder);

        let rows = builder
            .build_query_as::<MemberRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Counts members matching `condition`
    pub async fn fetch_count(&self, condition: &MemberSearchCondition) -> RepositoryResult<i64> {
        let mut builder = QueryBuilder::<Sqlite>::new(MEMBER_COUNT);
        condition.push_where(&mut builder);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Fetches one window of matching members, ordered by username
    /// descending, along with the total match count
    ///
    /// The content query is skipped when nothing matches. Negative `offset`
    /// and `limit` are clamped to zero.
    pub async fn fetch_results(
        &self,
        condition: &MemberSearchCondition,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<QueryResults<Member>> {
        let (offset, limit) = clamp_window(offset, limit);
        let total = self.fetch_count(condition).await?;
        if total == 0 {
            return Ok(QueryResults {
                total,
                limit,
                offset,
                results: Vec::new(),
            });
        }

        let mut builder = QueryBuilder::<Sqlite>::new(MEMBER_SELECT);
        condition.push_where(&mut builder);
        builder
            .push(" ORDER BY m.username DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<MemberRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(QueryResults {
            total,
            limit,
            offset,
            results: rows.into_iter().map(Member::from).collect(),
        })
    }

    // ===== Sorting and paging =====

    /// Members of the given age, oldest first, then by username with
    /// missing usernames last
    pub async fn find_sorted_by_age(&self, age: i32) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE age = ?
            ORDER BY age DESC, username ASC NULLS LAST
            "#,
        )
        .bind(age)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Members ordered by username descending, skipping `offset` rows and
    /// returning at most `limit`; negative values are clamped to zero
    pub async fn paging(&self, offset: i64, limit: i64) -> RepositoryResult<Vec<Member>> {
        let (offset, limit) = clamp_window(offset, limit);
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            ORDER BY username DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    // ===== Aggregation =====

    /// Count, sum, average, maximum and minimum of all members' ages
    pub async fn age_statistics(&self) -> RepositoryResult<AgeStatistics> {
        let stats = sqlx::query_as::<_, AgeStatistics>(
            r#"
            SELECT
                COUNT(*) AS count,
                SUM(age) AS sum,
                AVG(age) AS avg,
                MAX(age) AS max,
                MIN(age) AS min
            FROM members
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    /// Average member age per team, ordered by team name
    ///
    /// Members without a team are not counted.
    pub async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAverageAge>> {
        let rows = sqlx::query_as::<_, TeamAverageAge>(
            r#"
            SELECT t.name AS team_name, AVG(m.age) AS average_age
            FROM members m
            JOIN teams t ON m.team_id = t.id
            GROUP BY t.name
            ORDER BY t.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Teams whose members' average age is strictly above `min_average`
    pub async fn teams_with_average_age_above(
        &self,
        min_average: f64,
    ) -> RepositoryResult<Vec<TeamAverageAge>> {
        let rows = sqlx::query_as::<_, TeamAverageAge>(
            r#"
            SELECT t.name AS team_name, AVG(m.age) AS average_age
            FROM members m
            JOIN teams t ON m.team_id = t.id
            GROUP BY t.name
            HAVING AVG(m.age) > ?
            ORDER BY t.name
            "#,
        )
        .bind(min_average)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ===== Joins =====

    /// Members of the team named `team_name` (inner join)
    pub async fn members_of_team(&self, team_name: &str) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id AS id, m.username AS username, m.age AS age, m.team_id AS team_id
            FROM members m
            JOIN teams t ON m.team_id = t.id
            WHERE t.name = ?
            ORDER BY m.username
            "#,
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Members whose username equals some team's name (theta join)
    pub async fn members_named_after_teams(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.id AS id, m.username AS username, m.age AS age, m.team_id AS team_id
            FROM members m, teams t
            WHERE m.username = t.name
            ORDER BY m.username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Every member, with team columns filled only when the member's team is
    /// named `team_name`
    pub async fn members_left_join_team_named(
        &self,
        team_name: &str,
    ) -> RepositoryResult<Vec<MemberTeamDto>> {
        let rows = sqlx::query_as::<_, MemberTeamDto>(
            r#"
            SELECT
                m.id AS member_id, m.username, m.age,
                t.id AS team_id, t.name AS team_name
            FROM members m
            LEFT JOIN teams t ON m.team_id = t.id AND t.name = ?
            ORDER BY m.username ASC NULLS LAST
            "#,
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Every member, left joined to any team whose name equals the username
    pub async fn unrelated_left_join(&self) -> RepositoryResult<Vec<MemberTeamDto>> {
        let rows = sqlx::query_as::<_, MemberTeamDto>(
            r#"
            SELECT
                m.id AS member_id, m.username, m.age,
                t.id AS team_id, t.name AS team_name
            FROM members m
            LEFT JOIN teams t ON m.username = t.name
            ORDER BY m.username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Loads the member named `username` together with its team in one query
    pub async fn fetch_join_by_username(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<MemberWithTeam>> {
        let mut rows = sqlx::query_as::<_, MemberFetchJoinRow>(
            r#"
            SELECT
                m.id AS id, m.username AS username, m.age AS age, m.team_id AS team_id,
                t.id AS joined_team_id, t.name AS joined_team_name
            FROM members m
            LEFT JOIN teams t ON m.team_id = t.id
            WHERE m.username = ?
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop().map(MemberFetchJoinRow::into_member_with_team)),
            n => Err(RepositoryError::NonUniqueResult(n)),
        }
    }

    /// Loads the member named `username` without touching its team
    pub async fn find_without_team_fetch(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<MemberWithTeam>> {
        let mut rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop().map(|row| MemberWithTeam {
                member: Member::from(row),
                team: None,
            })),
            n => Err(RepositoryError::NonUniqueResult(n)),
        }
    }

    // ===== Subqueries =====

    /// Members with the highest age
    pub async fn oldest_members(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE age = (SELECT MAX(ms.age) FROM members ms)
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Members at least as old as the average, youngest first
    pub async fn members_at_least_average_age(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE age >= (SELECT AVG(ms.age) FROM members ms)
            ORDER BY age
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Members whose age is among the ages greater than `age`, youngest first
    pub async fn members_in_ages_above(&self, age: i32) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE age IN (SELECT ms.age FROM members ms WHERE ms.age > ?)
            ORDER BY age
            "#,
        )
        .bind(age)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Each username paired with the average age of all members
    pub async fn usernames_with_average_age(
        &self,
    ) -> RepositoryResult<Vec<(Option<String>, Option<f64>)>> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<f64>)>(
            r#"
            SELECT m.username, (SELECT AVG(ms.age) FROM members ms)
            FROM members m
            ORDER BY m.username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ===== CASE, constants and concatenation =====

    /// Describes each member's age as "ten", "twenty" or "other", youngest first
    pub async fn age_descriptions(&self) -> RepositoryResult<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            r#"
            SELECT CASE age
                WHEN 10 THEN 'ten'
                WHEN 20 THEN 'twenty'
                ELSE 'other'
            END
            FROM members
            ORDER BY age
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Usernames with their age bracket
    ///
    /// Ordered by bracket rank: "other" first, then "0-20", then "21-30".
    pub async fn age_brackets(&self) -> RepositoryResult<Vec<(Option<String>, String)>> {
        let rows = sqlx::query_as::<_, (Option<String>, String)>(
            r#"
            SELECT
                username,
                CASE
                    WHEN age BETWEEN 0 AND 20 THEN '0-20'
                    WHEN age BETWEEN 21 AND 30 THEN '21-30'
                    ELSE 'other'
                END
            FROM members
            ORDER BY
                CASE
                    WHEN age BETWEEN 0 AND 20 THEN 2
                    WHEN age BETWEEN 21 AND 30 THEN 1
                    ELSE 3
                END DESC,
                username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// `"{username}_{age}"` for members named `username`
    pub async fn username_with_age(&self, username: &str) -> RepositoryResult<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            r#"
            SELECT username || '_' || CAST(age AS TEXT)
            FROM members
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Each username paired with `constant`
    pub async fn usernames_with_constant(
        &self,
        constant: &str,
    ) -> RepositoryResult<Vec<(Option<String>, String)>> {
        let rows = sqlx::query_as::<_, (Option<String>, String)>(
            r#"
            SELECT username, ?
            FROM members
            ORDER BY username ASC NULLS LAST
            "#,
        )
        .bind(constant)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ===== Projections =====

    /// All usernames, missing ones last
    pub async fn usernames(&self) -> RepositoryResult<Vec<Option<String>>> {
        let rows = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT username
            FROM members
            ORDER BY username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Distinct usernames, missing ones last
    pub async fn distinct_usernames(&self) -> RepositoryResult<Vec<Option<String>>> {
        let rows = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT DISTINCT username
            FROM members
            ORDER BY username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Username and age of every member as plain tuples
    pub async fn username_age_tuples(&self) -> RepositoryResult<Vec<(Option<String>, i32)>> {
        let rows = sqlx::query_as::<_, (Option<String>, i32)>(
            r#"
            SELECT username, age
            FROM members
            ORDER BY username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Username and age of every member mapped onto [`MemberDto`]
    pub async fn member_dtos(&self) -> RepositoryResult<Vec<MemberDto>> {
        let rows = sqlx::query_as::<_, MemberDto>(
            r#"
            SELECT username, age
            FROM members
            ORDER BY username ASC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ===== SQL functions =====

    /// Usernames with every occurrence of `from` replaced by `to`
    pub async fn usernames_replaced(&self, from: &str, to: &str) -> RepositoryResult<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            r#"
            SELECT REPLACE(username, ?, ?)
            FROM members
            WHERE username IS NOT NULL
            ORDER BY username
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Members whose username is already lowercase
    pub async fn members_with_lowercase_username(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, username, age, team_id
            FROM members
            WHERE username = LOWER(username)
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    // ===== Bulk operations =====

    /// Renames every member younger than `age`; returns affected rows
    pub async fn bulk_rename_younger_than(&self, age: i32, username: &str) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE members SET username = ? WHERE age < ?")
            .bind(username)
            .bind(age)
            .execute(&self.pool)
            .await?;

        tracing::info!(rows = result.rows_affected(), "bulk rename applied");
        Ok(result.rows_affected())
    }

    /// Adds `delta` to every member's age; returns affected rows
    pub async fn bulk_add_age(&self, delta: i32) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE members SET age = age + ?")
            .bind(delta)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Multiplies every member's age by `factor`; returns affected rows
    pub async fn bulk_multiply_age(&self, factor: i32) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE members SET age = age * ?")
            .bind(factor)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every member older than `age`; returns affected rows
    pub async fn bulk_delete_older_than(&self, age: i32) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM members WHERE age > ?")
            .bind(age)
            .execute(&self.pool)
            .await?;

        tracing::info!(rows = result.rows_affected(), "bulk delete applied");
        Ok(result.rows_affected())
    }

    // ===== Search paging =====

    /// One page of search results; always runs the count query
    pub async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>> {
        let content = self.search_content(condition, request).await?;
        let total = self.fetch_count(condition).await?;

        Ok(Page::new(content, request, total))
    }

    /// One page of search results; runs the count query only when the total
    /// cannot be derived from the page itself
    pub async fn search_page_optimized(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>> {
        let content = self.search_content(condition, request).await?;
        let total = match derive_total(request, content.len()) {
            Some(total) => total,
            None => {
                tracing::debug!(page = request.page(), "running count query");
                self.fetch_count(condition).await?
            }
        };

        Ok(Page::new(content, request, total))
    }

    async fn search_content(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Vec<MemberTeamDto>> {
        let mut builder = QueryBuilder::<Sqlite>::new(MEMBER_TEAM_SELECT);
        condition.push_where(&mut builder);
        builder
            .push(" ORDER BY m.username ASC NULLS LAST, m.age ASC LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());

        let rows = builder
            .build_query_as::<MemberTeamDto>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
