use uuid::Uuid;

/// Team entity
///
/// Owns zero or more members. The owning side of the relationship lives on
/// [`Member`](crate::domain::member::Member); a team never holds its members
/// directly, they are loaded through the repository.
///
/// # Example
/// ```
/// use member_query_api::domain::team::Team;
///
/// let team = Team::new("teamA");
/// assert_eq!(team.name(), "teamA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: Uuid,
    name: String,
}

impl Team {
    /// Creates a new, not yet persisted team with a fresh identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// Renames the team
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ===== Getters =====

    /// Returns the team's ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the team's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(id: Uuid, name: String) -> Self {
        Self { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_team_with_name() {
        let team = Team::new("teamA");

        assert_eq!(team.name(), "teamA");
    }

    #[test]
    fn new_teams_get_distinct_ids() {
        let a = Team::new("teamA");
        let b = Team::new("teamA");

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn rename_keeps_identity() {
        let mut team = Team::new("teamA");
        let id = team.id();

        team.rename("teamC");

        assert_eq!(team.id(), id);
        assert_eq!(team.name(), "teamC");
    }

    #[test]
    fn from_persistence_restores_fields() {
        let id = Uuid::new_v4();
        let team = Team::from_persistence(id, "teamB".to_string());

        assert_eq!(team.id(), id);
        assert_eq!(team.name(), "teamB");
    }
}
