//! In-memory implementation of the repository traits.
//!
//! Backs tests that exercise search semantics without a database, using the
//! domain filter fragments as the predicate evaluator. The Postgres adapter
//! must agree with this one on every observable search behavior.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::member::search::{matches_all, sort_rows, UNSCOPED_ROW_CAP};
use crate::domain::member::{
    Member, MemberSearchCondition, MemberSort, MemberTeamDto, NewMember, PageRequest,
    PageResponse,
};
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::domain::team::{NewTeam, Team};

#[derive(Clone)]
struct MemberRecord {
    id: i64,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl MemberRecord {
    fn to_entity(&self) -> Member {
        Member::from_persistence(
            self.id,
            self.username.clone(),
            self.age,
            self.team_id,
            self.created_at,
        )
    }
}

#[derive(Clone)]
struct TeamRecord {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl TeamRecord {
    fn to_entity(&self) -> Team {
        Team::from_persistence(self.id, self.name.clone(), self.created_at)
    }
}

#[derive(Default)]
struct Inner {
    members: Vec<MemberRecord>,
    teams: Vec<TeamRecord>,
    next_member_id: i64,
    next_team_id: i64,
}

impl Inner {
    fn join_row(&self, member: &MemberRecord) -> MemberTeamDto {
        let team = member
            .team_id
            .and_then(|team_id| self.teams.iter().find(|t| t.id == team_id));

        MemberTeamDto {
            member_id: member.id,
            username: member.username.clone(),
            age: member.age,
            team_id: team.map(|t| t.id),
            team_name: team.map(|t| t.name.clone()),
        }
    }
}

/// Shared in-memory store implementing both repository traits
///
/// Cloning shares the underlying store, mirroring how pool handles share a
/// database.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| DomainError::StoreUnavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn create(&self, team: NewTeam) -> DomainResult<Team> {
        let mut inner = self.lock()?;
        inner.next_team_id += 1;
        let record = TeamRecord {
            id: inner.next_team_id,
            name: team.name().to_string(),
            created_at: Utc::now(),
        };
        let entity = record.to_entity();
        inner.teams.push(record);
        Ok(entity)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Team>> {
        let inner = self.lock()?;
        Ok(inner
            .teams
            .iter()
            .find(|t| t.id == id)
            .map(TeamRecord::to_entity))
    }

    async fn find_all(&self) -> DomainResult<Vec<Team>> {
        let inner = self.lock()?;
        Ok(inner.teams.iter().map(TeamRecord::to_entity).collect())
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn create(&self, member: NewMember) -> DomainResult<Member> {
        let mut inner = self.lock()?;
        inner.next_member_id += 1;
        let record = MemberRecord {
            id: inner.next_member_id,
            username: member.username().map(str::to_string),
            age: member.age(),
            team_id: member.team_id(),
            created_at: Utc::now(),
        };
        let entity = record.to_entity();
        inner.members.push(record);
        Ok(entity)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Member>> {
        let inner = self.lock()?;
        Ok(inner
            .members
            .iter()
            .find(|m| m.id == id)
            .map(MemberRecord::to_entity))
    }

    async fn find_all(&self) -> DomainResult<Vec<Member>> {
        let inner = self.lock()?;
        Ok(inner.members.iter().map(MemberRecord::to_entity).collect())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Member>> {
        let inner = self.lock()?;
        Ok(inner
            .members
            .iter()
            .filter(|m| m.username.as_deref() == Some(username))
            .map(MemberRecord::to_entity)
            .collect())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let mut inner = self.lock()?;
        let before = inner.members.len();
        inner.members.retain(|m| m.id != id);

        if inner.members.len() == before {
            return Err(DomainError::NotFound {
                entity: "member",
                id,
            });
        }
        Ok(())
    }

    async fn search(
        &self,
        condition: &MemberSearchCondition,
        sorts: &[MemberSort],
    ) -> DomainResult<Vec<MemberTeamDto>> {
        condition.validate()?;
        let filters = condition.filters();

        let inner = self.lock()?;
        let mut rows: Vec<MemberTeamDto> = inner
            .members
            .iter()
            .map(|m| inner.join_row(m))
            .filter(|row| matches_all(&filters, row))
            .collect();
        drop(inner);

        sort_rows(&mut rows, sorts);
        if condition.is_unbounded() {
            rows.truncate(UNSCOPED_ROW_CAP as usize);
        }
        Ok(rows)
    }

    async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        sorts: &[MemberSort],
        page: PageRequest,
    ) -> DomainResult<PageResponse<MemberTeamDto>> {
        condition.validate()?;
        let filters = condition.filters();

        let inner = self.lock()?;
        let mut rows: Vec<MemberTeamDto> = inner
            .members
            .iter()
            .map(|m| inner.join_row(m))
            .filter(|row| matches_all(&filters, row))
            .collect();
        drop(inner);

        sort_rows(&mut rows, sorts);
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse {
            items,
            total,
            offset: page.offset(),
            limit: page.limit(),
        })
    }

    async fn bulk_rename_below_age(&self, username: &str, age_lt: i32) -> DomainResult<u64> {
        let mut inner = self.lock()?;
        let mut affected = 0;
        for member in inner.members.iter_mut().filter(|m| m.age < age_lt) {
            member.username = Some(username.to_string());
            affected += 1;
        }
        Ok(affected)
    }

    async fn bulk_add_age(&self, delta: i32) -> DomainResult<u64> {
        if delta < 0 {
            return Err(DomainError::Validation {
                entity: "member",
                reason: format!("age delta must be non-negative, got {}", delta),
            });
        }

        let mut inner = self.lock()?;
        for member in inner.members.iter_mut() {
            member.age += delta;
        }
        Ok(inner.members.len() as u64)
    }

    async fn bulk_delete_above_age(&self, age_gt: i32) -> DomainResult<u64> {
        let mut inner = self.lock()?;
        let before = inner.members.len();
        inner.members.retain(|m| m.age <= age_gt);
        Ok((before - inner.members.len()) as u64)
    }
}
