//! Demo-data seeding for local development.

use sqlx::PgPool;

use crate::domain::error::DomainResult;
use crate::domain::member::NewMember;
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::domain::team::NewTeam;
use crate::infrastructure::repositories::{PostgresMemberRepository, PostgresTeamRepository};

/// Seeds two teams and one hundred members for local exploration
///
/// `member0..member99` with `age = i`, alternating between teamA and teamB.
/// Skipped when the store already holds members, so restarting the service
/// does not duplicate data.
pub async fn seed_demo_data(pool: &PgPool) -> DomainResult<()> {
    let (member_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
        .fetch_one(pool)
        .await?;
    if member_count > 0 {
        tracing::info!("demo data already present, skipping seed");
        return Ok(());
    }

    let team_repo = PostgresTeamRepository::new(pool.clone());
    let member_repo = PostgresMemberRepository::new(pool.clone());

    let team_a = team_repo.create(NewTeam::new("teamA")?).await?;
    let team_b = team_repo.create(NewTeam::new("teamB")?).await?;

    for i in 0..100 {
        let team_id = if i % 2 == 0 { team_a.id() } else { team_b.id() };
        let member = NewMember::new(Some(format!("member{}", i)), i, Some(team_id))?;
        member_repo.create(member).await?;
    }

    tracing::info!("seeded 2 teams and 100 members");
    Ok(())
}
