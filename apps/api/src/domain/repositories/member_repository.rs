use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::{Member, MemberSearchCondition, MemberTeamDto};

/// Repository trait for the Member entity
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a member (insert or update)
    ///
    /// Fails if the member references a team that was never saved.
    async fn save(&self, member: &Member) -> RepositoryResult<()>;

    /// Find a member by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Member>>;

    /// Find all members, ordered by username with missing names last
    async fn find_all(&self) -> RepositoryResult<Vec<Member>>;

    /// Find all members with the given username
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>>;

    /// Search members with optional filters, joined with their team's name
    async fn search(&self, condition: &MemberSearchCondition)
        -> RepositoryResult<Vec<MemberTeamDto>>;

    /// Delete a member by ID
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
