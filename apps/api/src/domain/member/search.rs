use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// Optional filters for member searches
///
/// Every present field narrows the result; absent or blank fields are
/// ignored. Queries filtered by a condition must alias `members` as `m` and
/// `teams` as `t`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

/// A single conjunct of a member filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPredicate {
    UsernameEq(String),
    TeamNameEq(String),
    AgeGoe(i32),
    AgeLoe(i32),
}

impl SearchPredicate {
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            SearchPredicate::UsernameEq(username) => {
                builder.push("m.username = ").push_bind(username.clone());
            }
            SearchPredicate::TeamNameEq(team_name) => {
                builder.push("t.name = ").push_bind(team_name.clone());
            }
            SearchPredicate::AgeGoe(age) => {
                builder.push("m.age >= ").push_bind(*age);
            }
            SearchPredicate::AgeLoe(age) => {
                builder.push("m.age <= ").push_bind(*age);
            }
        }
    }
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// Returns one predicate per present field, in field order
    pub fn predicates(&self) -> Vec<SearchPredicate> {
        let mut predicates = Vec::with_capacity(4);

        if let Some(username) = has_text(&self.username) {
            predicates.push(SearchPredicate::UsernameEq(username.to_string()));
        }
        if let Some(team_name) = has_text(&self.team_name) {
            predicates.push(SearchPredicate::TeamNameEq(team_name.to_string()));
        }
        if let Some(age) = self.age_goe {
            predicates.push(SearchPredicate::AgeGoe(age));
        }
        if let Some(age) = self.age_loe {
            predicates.push(SearchPredicate::AgeLoe(age));
        }

        predicates
    }

    /// Returns true if no field restricts the search
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Appends ` WHERE p1 AND p2 ...` to `builder`; appends nothing when
    /// every field is absent
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        for (i, predicate) in self.predicates().iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(builder);
        }
    }
}

fn has_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_condition_has_no_predicates() {
        let condition = MemberSearchCondition::new();

        assert!(condition.predicates().is_empty());
        assert!(condition.is_empty());
    }

    #[test]
    fn present_fields_become_predicates_in_order() {
        let condition = MemberSearchCondition::new()
            .age_loe(40)
            .team_name("teamB")
            .age_goe(35);

        assert_eq!(
            condition.predicates(),
            vec![
                SearchPredicate::TeamNameEq("teamB".to_string()),
                SearchPredicate::AgeGoe(35),
                SearchPredicate::AgeLoe(40),
            ]
        );
    }

    #[test]
    fn blank_strings_are_ignored() {
        let condition = MemberSearchCondition {
            username: Some("".to_string()),
            team_name: Some("   ".to_string()),
            age_goe: None,
            age_loe: None,
        };

        assert!(condition.is_empty());
    }

    #[test]
    fn push_where_without_predicates_leaves_query_untouched() {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM members m");
        MemberSearchCondition::new().push_where(&mut builder);

        assert_eq!(builder.sql(), "SELECT * FROM members m");
    }

    #[test]
    fn push_where_joins_predicates_with_and() {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM members m");
        MemberSearchCondition::new()
            .username("member1")
            .age_goe(10)
            .push_where(&mut builder);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM members m WHERE m.username = ? AND m.age >= ?"
        );
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let condition: MemberSearchCondition =
            serde_json::from_str(r#"{"teamName":"teamA","ageGoe":20}"#).unwrap();

        assert_eq!(condition.team_name.as_deref(), Some("teamA"));
        assert_eq!(condition.age_goe, Some(20));
        assert!(condition.username.is_none());
    }
}
