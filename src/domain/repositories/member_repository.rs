use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::member::{
    Member, MemberSearchCondition, MemberSort, MemberTeamDto, NewMember, PageRequest,
    PageResponse,
};

/// Repository trait for members
///
/// Defines the contract for persisting and querying members. The search
/// operations are stateless, idempotent reads; implementations assert no
/// ordering or atomicity guarantees beyond the store's own.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a new member; the store assigns the id
    async fn create(&self, member: NewMember) -> DomainResult<Member>;

    /// Find a member by its id
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Member>>;

    /// Find all members
    async fn find_all(&self) -> DomainResult<Vec<Member>>;

    /// Find members by exact username
    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Member>>;

    /// Delete a member by id; `NotFound` when no row matches
    async fn delete(&self, id: i64) -> DomainResult<()>;

    /// Condition-driven search over members left-joined to their teams
    ///
    /// Applies the condition's composed predicate and the caller's sort
    /// keys, returning the flat member/team projection. When every condition
    /// field is absent the result is capped at
    /// [`UNSCOPED_ROW_CAP`](crate::domain::member::search::UNSCOPED_ROW_CAP).
    async fn search(
        &self,
        condition: &MemberSearchCondition,
        sorts: &[MemberSort],
    ) -> DomainResult<Vec<MemberTeamDto>>;

    /// Paged variant of [`search`](MemberRepository::search)
    ///
    /// Issues two independent reads: the joined data query bounded by the
    /// page, and a count query that joins the team table only when the
    /// predicate actually references it.
    async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        sorts: &[MemberSort],
        page: PageRequest,
    ) -> DomainResult<PageResponse<MemberTeamDto>>;

    /// Set the username of every member younger than `age_lt`
    ///
    /// Returns the number of affected rows.
    async fn bulk_rename_below_age(&self, username: &str, age_lt: i32) -> DomainResult<u64>;

    /// Add `delta` years to every member's age; `delta` must be non-negative
    async fn bulk_add_age(&self, delta: i32) -> DomainResult<u64>;

    /// Delete every member older than `age_gt`
    async fn bulk_delete_above_age(&self, age_gt: i32) -> DomainResult<u64>;
}
