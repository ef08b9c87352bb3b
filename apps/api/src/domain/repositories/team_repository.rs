use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;
use crate::domain::team::Team;

/// Repository trait for the Team entity
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team (insert or update)
    async fn save(&self, team: &Team) -> RepositoryResult<()>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>>;

    /// Find all teams with the given name
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Team>>;

    /// Find all teams, ordered by name
    async fn find_all(&self) -> RepositoryResult<Vec<Team>>;

    /// Load the members of a team (inverse side of the relationship)
    async fn find_members(&self, team_id: Uuid) -> RepositoryResult<Vec<Member>>;

    /// Delete a team by ID; its members are kept without a team
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
