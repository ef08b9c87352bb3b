//! Integration tests for the repository layer
//!
//! Each test runs against its own in-memory SQLite database with the schema
//! applied, so tests never observe each other's rows.

use member_query_api::domain::errors::RepositoryError;
use member_query_api::domain::member::{Member, MemberSearchCondition};
use member_query_api::domain::repositories::{MemberRepository, TeamRepository};
use member_query_api::domain::team::Team;
use member_query_api::infrastructure::database;
use member_query_api::infrastructure::repositories::{
    SqliteMemberRepository, SqliteTeamRepository,
};
use sqlx::SqlitePool;

/// Set up an isolated database
async fn setup_test_db() -> SqlitePool {
    database::connect_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Standard fixture: teamA (member1/10, member2/20), teamB (member3/30, member4/40)
async fn create_fixture(pool: &SqlitePool) -> (Team, Team, Vec<Member>) {
    let team_repo = SqliteTeamRepository::new(pool.clone());
    let member_repo = SqliteMemberRepository::new(pool.clone());

    let team_a = Team::new("teamA");
    let team_b = Team::new("teamB");
    team_repo.save(&team_a).await.expect("save teamA");
    team_repo.save(&team_b).await.expect("save teamB");

    let members = vec![
        Member::new(Some("member1".to_string()), 10, Some(&team_a)),
        Member::new(Some("member2".to_string()), 20, Some(&team_a)),
        Member::new(Some("member3".to_string()), 30, Some(&team_b)),
        Member::new(Some("member4".to_string()), 40, Some(&team_b)),
    ];
    for member in &members {
        member_repo.save(member).await.expect("save member");
    }

    (team_a, team_b, members)
}

#[tokio::test]
async fn test_member_repository_basic_crud() {
    let pool = setup_test_db().await;
    let member_repo = SqliteMemberRepository::new(pool.clone());

    let member = Member::named("member1", 10);
    member_repo.save(&member).await.expect("Failed to save member");

    let found = member_repo
        .find_by_id(member.id())
        .await
        .expect("Failed to find member")
        .expect("Member should exist");
    assert_eq!(found, member);

    let all = member_repo.find_all().await.expect("Failed to list members");
    assert_eq!(all, vec![member.clone()]);

    let by_name = member_repo
        .find_by_username("member1")
        .await
        .expect("Failed to find by username");
    assert_eq!(by_name, vec![member]);
}

#[tokio::test]
async fn test_member_repository_find_missing_returns_none() {
    let pool = setup_test_db().await;
    let member_repo = SqliteMemberRepository::new(pool);

    let found = member_repo
        .find_by_id(uuid::Uuid::new_v4())
        .await
        .expect("Query should succeed");

    assert!(found.is_none());
}

#[tokio::test]
async fn test_member_repository_save_updates_existing_row() {
    let pool = setup_test_db().await;
    let (_team_a, team_b, members) = create_fixture(&pool).await;
    let member_repo = SqliteMemberRepository::new(pool.clone());

    let mut member1 = members[0].clone();
    member1.change_team(&team_b);
    member_repo.save(&member1).await.expect("Failed to update member");

    let found = member_repo
        .find_by_id(member1.id())
        .await
        .expect("Failed to find member")
        .expect("Member should exist");
    assert!(found.is_member_of(&team_b));
    assert_eq!(member_repo.find_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_member_repository_keeps_null_username() {
    let pool = setup_test_db().await;
    let member_repo = SqliteMemberRepository::new(pool);

    let member = Member::new(None, 100, None);
    member_repo.save(&member).await.expect("Failed to save member");

    let found = member_repo
        .find_by_id(member.id())
        .await
        .unwrap()
        .expect("Member should exist");
    assert!(found.username().is_none());
    assert!(found.team_id().is_none());
}

#[tokio::test]
async fn test_member_with_unsaved_team_is_rejected() {
    let pool = setup_test_db().await;
    let member_repo = SqliteMemberRepository::new(pool);

    let transient_team = Team::new("ghost");
    let member = Member::new(Some("member1".to_string()), 10, Some(&transient_team));

    let result = member_repo.save(&member).await;

    let err = result.expect_err("Saving a member of an unsaved team should fail");
    assert!(
        err.is_foreign_key_violation(),
        "Expected a foreign key violation, got: {}",
        err
    );
}

#[tokio::test]
async fn test_member_repository_delete() {
    let pool = setup_test_db().await;
    let (_, _, members) = create_fixture(&pool).await;
    let member_repo = SqliteMemberRepository::new(pool);

    member_repo
        .delete(members[0].id())
        .await
        .expect("Failed to delete member");
    assert!(member_repo.find_by_id(members[0].id()).await.unwrap().is_none());

    let again = member_repo.delete(members[0].id()).await;
    assert!(matches!(again, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_search_with_team_and_age_range() {
    let pool = setup_test_db().await;
    create_fixture(&pool).await;
    let member_repo = SqliteMemberRepository::new(pool);

    let condition = MemberSearchCondition::new()
        .age_goe(35)
        .age_loe(40)
        .team_name("teamB");

    let result = member_repo.search(&condition).await.expect("Search failed");

    let usernames: Vec<_> = result.iter().map(|r| r.username.as_deref()).collect();
    assert_eq!(usernames, vec![Some("member4")]);
    assert_eq!(result[0].team_name.as_deref(), Some("teamB"));
    assert_eq!(result[0].age, 40);
}

#[tokio::test]
async fn test_search_without_filters_returns_everyone() {
    let pool = setup_test_db().await;
    let (team_a, _, _) = create_fixture(&pool).await;
    let member_repo = SqliteMemberRepository::new(pool.clone());
    member_repo
        .save(&Member::named("loner", 50))
        .await
        .expect("save loner");

    let result = member_repo
        .search(&MemberSearchCondition::default())
        .await
        .expect("Search failed");

    assert_eq!(result.len(), 5);
    assert_eq!(result[0].username.as_deref(), Some("loner"));
    assert!(result[0].team_name.is_none());
    assert!(result[0].team_id.is_none());
    assert_eq!(result[1].username.as_deref(), Some("member1"));
    assert_eq!(result[1].team_id, Some(team_a.id()));
}

#[tokio::test]
async fn test_search_by_username_only() {
    let pool = setup_test_db().await;
    create_fixture(&pool).await;
    let member_repo = SqliteMemberRepository::new(pool);

    let result = member_repo
        .search(&MemberSearchCondition::new().username("member2"))
        .await
        .expect("Search failed");

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].team_name.as_deref(), Some("teamA"));
}

#[tokio::test]
async fn test_search_ignores_blank_filters() {
    let pool = setup_test_db().await;
    create_fixture(&pool).await;
    let member_repo = SqliteMemberRepository::new(pool);

    let condition = MemberSearchCondition {
        username: Some(String::new()),
        team_name: Some("  ".to_string()),
        age_goe: Some(20),
        age_loe: None,
    };

    let result = member_repo.search(&condition).await.expect("Search failed");

    assert_eq!(result.len(), 3);
}

#[tokio::test]
async fn test_team_repository_find_members() {
    let pool = setup_test_db().await;
    let (team_a, _, _) = create_fixture(&pool).await;
    let team_repo = SqliteTeamRepository::new(pool);

    let members = team_repo
        .find_members(team_a.id())
        .await
        .expect("Failed to load members");

    let usernames: Vec<_> = members.iter().map(|m| m.username()).collect();
    assert_eq!(usernames, vec![Some("member1"), Some("member2")]);
}

#[tokio::test]
async fn test_team_repository_find_by_id_and_name() {
    let pool = setup_test_db().await;
    let (team_a, team_b, _) = create_fixture(&pool).await;
    let team_repo = SqliteTeamRepository::new(pool);

    let found = team_repo
        .find_by_id(team_b.id())
        .await
        .unwrap()
        .expect("Team should exist");
    assert_eq!(found, team_b);

    let by_name = team_repo.find_by_name("teamA").await.unwrap();
    assert_eq!(by_name, vec![team_a.clone()]);

    let all = team_repo.find_all().await.unwrap();
    assert_eq!(all, vec![team_a, team_b]);
}

#[tokio::test]
async fn test_team_rename_is_persisted() {
    let pool = setup_test_db().await;
    let (mut team_a, _, _) = create_fixture(&pool).await;
    let team_repo = SqliteTeamRepository::new(pool);

    team_a.rename("teamC");
    team_repo.save(&team_a).await.expect("Failed to update team");

    assert!(team_repo.find_by_name("teamA").await.unwrap().is_empty());
    assert_eq!(team_repo.find_by_name("teamC").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_team_delete_detaches_members() {
    let pool = setup_test_db().await;
    let (team_a, _, members) = create_fixture(&pool).await;
    let team_repo = SqliteTeamRepository::new(pool.clone());
    let member_repo = SqliteMemberRepository::new(pool);

    team_repo.delete(team_a.id()).await.expect("Failed to delete team");

    assert!(team_repo.find_by_id(team_a.id()).await.unwrap().is_none());
    let member1 = member_repo
        .find_by_id(members[0].id())
        .await
        .unwrap()
        .expect("Member should survive its team");
    assert!(member1.team_id().is_none());

    let again = team_repo.delete(team_a.id()).await;
    assert!(matches!(again, Err(RepositoryError::NotFound(_))));
}
