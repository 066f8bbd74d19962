use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::member::search::UNSCOPED_ROW_CAP;
use crate::domain::member::{
    Member, MemberFilter, MemberSearchCondition, MemberSort, MemberSortKey, MemberTeamDto,
    NewMember, PageRequest, PageResponse, SortDirection,
};
use crate::domain::repositories::MemberRepository;

/// PostgreSQL implementation of MemberRepository
///
/// Search queries are assembled at runtime from the condition's filter
/// fragments with bound parameters; no user input is spliced into SQL.
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    /// Creates a new PostgresMemberRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i64,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member::from_persistence(row.id, row.username, row.age, row.team_id, row.created_at)
    }
}

// The projection query; `WHERE TRUE` anchors the AND fragments that follow.
const SELECT_MEMBER_TEAM: &str = "\
SELECT m.id AS member_id, m.username, m.age, t.id AS team_id, t.name AS team_name \
FROM members m \
LEFT JOIN teams t ON t.id = m.team_id \
WHERE TRUE";

/// Appends one `AND <test>` per filter fragment, values bound as parameters
fn push_filters<'qb>(qb: &mut QueryBuilder<'qb, Postgres>, filters: &'qb [MemberFilter]) {
    for filter in filters {
        qb.push(" AND ");
        match filter {
            MemberFilter::UsernameEq(name) => {
                qb.push("m.username = ").push_bind(name.as_str());
            }
            MemberFilter::AgeGoe(age) => {
                qb.push("m.age >= ").push_bind(*age);
            }
            MemberFilter::AgeLoe(age) => {
                qb.push("m.age <= ").push_bind(*age);
            }
            MemberFilter::TeamNameEq(name) => {
                qb.push("t.name = ").push_bind(name.as_str());
            }
        }
    }
}

/// Appends the ORDER BY clause for the caller's sort keys
///
/// Column and direction come from enum matches, never from caller strings.
/// `NULLS LAST` keeps null usernames at the end in both directions, and the
/// trailing id tiebreaker makes the ordering total.
fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, sorts: &[MemberSort]) {
    qb.push(" ORDER BY ");
    for sort in sorts {
        qb.push(order_column(sort.key));
        qb.push(match sort.direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        });
        if sort.key == MemberSortKey::Username {
            qb.push(" NULLS LAST");
        }
        qb.push(", ");
    }
    qb.push("m.id ASC");
}

fn order_column(key: MemberSortKey) -> &'static str {
    match key {
        MemberSortKey::Id => "m.id",
        MemberSortKey::Username => "m.username",
        MemberSortKey::Age => "m.age",
    }
}

impl PostgresMemberRepository {
    /// Count query for a predicate, structurally independent from the data
    /// query: the team join is included only when a fragment references the
    /// team, so unjoined counts never pay the join cost.
    async fn count(&self, filters: &[MemberFilter]) -> DomainResult<i64> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM members m");
        if filters.iter().any(MemberFilter::references_team) {
            qb.push(" LEFT JOIN teams t ON t.id = m.team_id");
        }
        qb.push(" WHERE TRUE");
        push_filters(&mut qb, filters);

        let (total,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(total)
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn create(&self, member: NewMember) -> DomainResult<Member> {
        let row = sqlx::query_as::<_, MemberRow>(
            "INSERT INTO members (username, age, team_id) VALUES ($1, $2, $3) \
             RETURNING id, username, age, team_id, created_at",
        )
        .bind(member.username())
        .bind(member.age())
        .bind(member.team_id())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, username, age, team_id, created_at FROM members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    async fn find_all(&self) -> DomainResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, username, age, team_id, created_at FROM members ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, username, age, team_id, created_at FROM members \
             WHERE username = $1 ORDER BY id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
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

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_MEMBER_TEAM);
        push_filters(&mut qb, &filters);
        push_order_by(&mut qb, sorts);
        if condition.is_unbounded() {
            qb.push(" LIMIT ").push_bind(UNSCOPED_ROW_CAP);
        }

        let rows = qb
            .build_query_as::<MemberTeamDto>()
            .fetch_all(&self.pool)
            .await?;
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

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_MEMBER_TEAM);
        push_filters(&mut qb, &filters);
        push_order_by(&mut qb, sorts);
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());

        let items = qb
            .build_query_as::<MemberTeamDto>()
            .fetch_all(&self.pool)
            .await?;
        let total = self.count(&filters).await?;

        Ok(PageResponse {
            items,
            total,
            offset: page.offset(),
            limit: page.limit(),
        })
    }

    async fn bulk_rename_below_age(&self, username: &str, age_lt: i32) -> DomainResult<u64> {
        let result = sqlx::query("UPDATE members SET username = $1 WHERE age < $2")
            .bind(username)
            .bind(age_lt)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn bulk_add_age(&self, delta: i32) -> DomainResult<u64> {
        if delta < 0 {
            return Err(DomainError::Validation {
                entity: "member",
                reason: format!("age delta must be non-negative, got {}", delta),
            });
        }

        let result = sqlx::query("UPDATE members SET age = age + $1")
            .bind(delta)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn bulk_delete_above_age(&self, age_gt: i32) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM members WHERE age > $1")
            .bind(age_gt)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
