use uuid::Uuid;

use crate::domain::team::Team;

/// Member entity
///
/// A member optionally belongs to one [`Team`]. The username is nullable and
/// the age carries no range restriction.
///
/// # Invariants
/// - A team reference, if set, points at a team that is persisted before the
///   member is saved (enforced by the schema's foreign key)
///
/// # Example
/// ```
/// use member_query_api::domain::member::Member;
/// use member_query_api::domain::team::Team;
///
/// let team = Team::new("teamA");
/// let member = Member::new(Some("member1".to_string()), 10, Some(&team));
///
/// assert_eq!(member.username(), Some("member1"));
/// assert_eq!(member.team_id(), Some(team.id()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: Uuid,
    username: Option<String>,
    age: i32,
    team_id: Option<Uuid>,
}

impl Member {
    /// Creates a new, not yet persisted member
    ///
    /// # Arguments
    /// * `username` - Optional display name
    /// * `age` - Age in years
    /// * `team` - Team to join, if any
    pub fn new(username: Option<String>, age: i32, team: Option<&Team>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            age,
            team_id: team.map(Team::id),
        }
    }

    /// Shorthand for a named member without a team
    pub fn named(username: impl Into<String>, age: i32) -> Self {
        Self::new(Some(username.into()), age, None)
    }

    /// Moves the member into `team`
    pub fn change_team(&mut self, team: &Team) {
        self.team_id = Some(team.id());
    }

    /// Removes the member from its current team
    pub fn leave_team(&mut self) {
        self.team_id = None;
    }

    /// Returns true if the member belongs to `team`
    pub fn is_member_of(&self, team: &Team) -> bool {
        self.team_id == Some(team.id())
    }

    // ===== Getters =====

    /// Returns the member's ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the username, if set
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the member's age
    pub fn age(&self) -> i32 {
        self.age
    }

    /// Returns the ID of the member's team, if any
    pub fn team_id(&self) -> Option<Uuid> {
        self.team_id
    }

    /// Reconstructs a Member from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: Uuid,
        username: Option<String>,
        age: i32,
        team_id: Option<Uuid>,
    ) -> Self {
        Self {
            id,
            username,
            age,
            team_id,
        }
    }
}
