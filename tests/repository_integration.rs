//! Integration tests for the PostgreSQL repository layer.
//!
//! These verify that the Postgres adapters agree with the in-memory
//! reference semantics: predicate composition, left-join projection,
//! ordering with nulls last, paging with independent counts, and CRUD.
//!
//! They require `DATABASE_URL` pointing at a PostgreSQL instance and are
//! ignored by default; run them with `cargo test -- --ignored`.

use std::time::{SystemTime, UNIX_EPOCH};

use roster_api::domain::member::{
    MemberSearchCondition, MemberSort, MemberSortKey, NewMember, PageRequest,
};
use roster_api::domain::repositories::{MemberRepository, TeamRepository};
use roster_api::domain::team::NewTeam;
use roster_api::infrastructure::repositories::{PostgresMemberRepository, PostgresTeamRepository};
use sqlx::PgPool;

/// Set up test database connection pool and apply migrations
async fn setup_test_db() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Unique suffix so concurrent test runs do not collide on team names
fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}", nanos)
}

struct Fixture {
    team_a: String,
    team_b: String,
    member_ids: Vec<i64>,
    team_ids: Vec<i64>,
}

/// Seeds the four-member fixture with run-unique team names:
/// ages 10/20 in teamA, 30/40 in teamB.
async fn seed_four(pool: &PgPool) -> Fixture {
    let team_repo = PostgresTeamRepository::new(pool.clone());
    let member_repo = PostgresMemberRepository::new(pool.clone());

    let suffix = unique_suffix();
    let team_a_name = format!("teamA-{}", suffix);
    let team_b_name = format!("teamB-{}", suffix);

    let team_a = team_repo
        .create(NewTeam::new(team_a_name.clone()).expect("valid team"))
        .await
        .expect("Failed to create teamA");
    let team_b = team_repo
        .create(NewTeam::new(team_b_name.clone()).expect("valid team"))
        .await
        .expect("Failed to create teamB");

    let mut member_ids = Vec::new();
    for (name, age, team_id) in [
        ("member1", 10, team_a.id()),
        ("member2", 20, team_a.id()),
        ("member3", 30, team_b.id()),
        ("member4", 40, team_b.id()),
    ] {
        let member = member_repo
            .create(
                NewMember::new(Some(format!("{}-{}", name, suffix)), age, Some(team_id))
                    .expect("valid member"),
            )
            .await
            .expect("Failed to create member");
        member_ids.push(member.id());
    }

    Fixture {
        team_a: team_a_name,
        team_b: team_b_name,
        member_ids,
        team_ids: vec![team_a.id(), team_b.id()],
    }
}

/// Clean up test data after each test
async fn cleanup(pool: &PgPool, fixture: &Fixture) {
    for id in &fixture.member_ids {
        // Bulk tests may already have deleted some rows.
        let _ = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await;
    }
    for id in &fixture.team_ids {
        sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .expect("Failed to cleanup team");
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn member_crud_roundtrip() {
    let pool = setup_test_db().await;
    let repo = PostgresMemberRepository::new(pool.clone());

    let name = format!("member-crud-{}", unique_suffix());
    let created = repo
        .create(NewMember::new(Some(name.clone()), 10, None).expect("valid member"))
        .await
        .expect("Failed to create member");

    let found = repo
        .find_by_id(created.id())
        .await
        .expect("Failed to find member")
        .expect("Member should exist");
    assert_eq!(found, created);

    let by_name = repo
        .find_by_username(&name)
        .await
        .expect("Failed to find by username");
    assert_eq!(by_name, vec![created.clone()]);

    repo.delete(created.id()).await.expect("Failed to delete");
    assert!(repo
        .find_by_id(created.id())
        .await
        .expect("Failed to find member")
        .is_none());

    let err = repo.delete(created.id()).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn search_age_range_and_team_returns_only_member4() {
    let pool = setup_test_db().await;
    let fixture = seed_four(&pool).await;
    let repo = PostgresMemberRepository::new(pool.clone());

    let condition = MemberSearchCondition {
        age_goe: Some(35),
        age_loe: Some(40),
        team_name: Some(fixture.team_b.clone()),
        ..Default::default()
    };

    let rows = repo.search(&condition, &[]).await.expect("search failed");

    assert_eq!(rows.len(), 1);
    assert!(rows[0]
        .username
        .as_deref()
        .expect("username set")
        .starts_with("member4"));
    assert_eq!(rows[0].age, 40);
    assert_eq!(rows[0].team_name.as_deref(), Some(fixture.team_b.as_str()));

    cleanup(&pool, &fixture).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn username_desc_orders_fixture_members() {
    let pool = setup_test_db().await;
    let fixture = seed_four(&pool).await;
    let repo = PostgresMemberRepository::new(pool.clone());

    // The database is shared, so assert relative order within the fixture
    // rather than absolute page contents.
    let condition = MemberSearchCondition {
        age_goe: Some(10),
        age_loe: Some(40),
        ..Default::default()
    };
    let rows = repo
        .search(&condition, &[MemberSort::desc(MemberSortKey::Username)])
        .await
        .expect("search failed");

    let names: Vec<_> = rows
        .iter()
        .filter(|r| fixture.member_ids.contains(&r.member_id))
        .map(|r| r.username.as_deref().expect("username set"))
        .collect();

    assert_eq!(names.len(), 4);
    assert!(names[0].starts_with("member4"));
    assert!(names[1].starts_with("member3"));
    assert!(names[2].starts_with("member2"));
    assert!(names[3].starts_with("member1"));

    cleanup(&pool, &fixture).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn paged_search_on_team_returns_slice_and_total() {
    let pool = setup_test_db().await;
    let fixture = seed_four(&pool).await;
    let repo = PostgresMemberRepository::new(pool.clone());

    let condition = MemberSearchCondition {
        team_name: Some(fixture.team_a.clone()),
        ..Default::default()
    };

    let page = repo
        .search_page(
            &condition,
            &[MemberSort::asc(MemberSortKey::Age)],
            PageRequest::new(1, 2).unwrap(),
        )
        .await
        .expect("search_page failed");

    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].age, 20);

    cleanup(&pool, &fixture).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn member_without_team_has_null_team_fields() {
    let pool = setup_test_db().await;
    let repo = PostgresMemberRepository::new(pool.clone());

    let name = format!("drifter-{}", unique_suffix());
    let created = repo
        .create(NewMember::new(Some(name.clone()), 50, None).expect("valid member"))
        .await
        .expect("Failed to create member");

    let condition = MemberSearchCondition {
        username: Some(name),
        ..Default::default()
    };
    let rows = repo.search(&condition, &[]).await.expect("search failed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].team_id, None);
    assert_eq!(rows[0].team_name, None);

    repo.delete(created.id()).await.expect("Failed to cleanup");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn search_is_idempotent_against_unchanged_store() {
    let pool = setup_test_db().await;
    let fixture = seed_four(&pool).await;
    let repo = PostgresMemberRepository::new(pool.clone());

    let condition = MemberSearchCondition {
        team_name: Some(fixture.team_b.clone()),
        ..Default::default()
    };
    let sorts = [MemberSort::desc(MemberSortKey::Age)];

    let first = repo.search(&condition, &sorts).await.expect("search failed");
    let second = repo.search(&condition, &sorts).await.expect("search failed");
    assert_eq!(first, second);

    cleanup(&pool, &fixture).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn concatenated_pages_reconstruct_unpaged_result() {
    let pool = setup_test_db().await;
    let fixture = seed_four(&pool).await;
    let repo = PostgresMemberRepository::new(pool.clone());

    let condition = MemberSearchCondition {
        age_goe: Some(10),
        age_loe: Some(40),
        ..Default::default()
    };
    let sorts = [MemberSort::asc(MemberSortKey::Age)];

    let unpaged: Vec<_> = repo
        .search(&condition, &sorts)
        .await
        .expect("search failed")
        .into_iter()
        .filter(|r| fixture.member_ids.contains(&r.member_id))
        .collect();

    let mut collected = Vec::new();
    let mut offset = 0;
    loop {
        let page = repo
            .search_page(&condition, &sorts, PageRequest::new(offset, 2).unwrap())
            .await
            .expect("search_page failed");
        if page.items.is_empty() {
            break;
        }
        offset += page.items.len() as i64;
        collected.extend(
            page.items
                .into_iter()
                .filter(|r| fixture.member_ids.contains(&r.member_id)),
        );
    }

    assert_eq!(collected, unpaged);

    cleanup(&pool, &fixture).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn team_crud_roundtrip() {
    let pool = setup_test_db().await;
    let repo = PostgresTeamRepository::new(pool.clone());

    let name = format!("team-crud-{}", unique_suffix());
    let created = repo
        .create(NewTeam::new(name.clone()).expect("valid team"))
        .await
        .expect("Failed to create team");

    let found = repo
        .find_by_id(created.id())
        .await
        .expect("Failed to find team")
        .expect("Team should exist");
    assert_eq!(found.name(), name);

    sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(created.id())
        .execute(&pool)
        .await
        .expect("Failed to cleanup team");
}
