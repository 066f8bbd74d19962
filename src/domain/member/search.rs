use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Hard cap applied to an unpaged search when every condition field is
/// absent. An unscoped predicate matches the whole store, so the read is
/// bounded here instead of returning an unbounded result set.
pub const UNSCOPED_ROW_CAP: i64 = 1000;

/// Flat projection of a member row joined (left) to its team
///
/// `team_id`/`team_name` are `None` for members without a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MemberTeamDto {
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

/// Sparse search condition over members
///
/// Each field is independently optional; an absent field contributes no
/// constraint. Absence never means "match null", and no sentinel values
/// (`0`, `""`) are interpreted as absence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    pub team_name: Option<String>,
}

impl MemberSearchCondition {
    /// Checks internal consistency before any query is built
    ///
    /// An impossible age range is an error, not a silently empty query.
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(goe), Some(loe)) = (self.age_goe, self.age_loe) {
            if goe > loe {
                return Err(DomainError::InvalidCondition(format!(
                    "age_goe ({}) > age_loe ({})",
                    goe, loe
                )));
            }
        }
        Ok(())
    }

    /// Builds the composed predicate as an explicit list of filter fragments
    ///
    /// Present fields each contribute one fragment; folding the fragments
    /// with logical AND is the predicate. An empty list matches all records.
    pub fn filters(&self) -> Vec<MemberFilter> {
        let mut filters = Vec::new();

        if let Some(username) = &self.username {
            filters.push(MemberFilter::UsernameEq(username.clone()));
        }
        if let Some(age) = self.age_goe {
            filters.push(MemberFilter::AgeGoe(age));
        }
        if let Some(age) = self.age_loe {
            filters.push(MemberFilter::AgeLoe(age));
        }
        if let Some(team_name) = &self.team_name {
            filters.push(MemberFilter::TeamNameEq(team_name.clone()));
        }

        filters
    }

    /// True when every field is absent, i.e. the predicate matches everything
    pub fn is_unbounded(&self) -> bool {
        self.username.is_none()
            && self.age_goe.is_none()
            && self.age_loe.is_none()
            && self.team_name.is_none()
    }
}

/// One fragment of a composed member predicate
///
/// Each variant carries its comparison value; adapters translate fragments
/// to their own query form, while [`MemberFilter::matches`] is the reference
/// evaluation over a joined row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberFilter {
    UsernameEq(String),
    AgeGoe(i32),
    AgeLoe(i32),
    TeamNameEq(String),
}

impl MemberFilter {
    /// Evaluates this fragment against a joined member/team row
    ///
    /// An equality test against a null column is false, never a match.
    pub fn matches(&self, row: &MemberTeamDto) -> bool {
        match self {
            Self::UsernameEq(name) => row.username.as_deref() == Some(name.as_str()),
            Self::AgeGoe(age) => row.age >= *age,
            Self::AgeLoe(age) => row.age <= *age,
            Self::TeamNameEq(name) => row.team_name.as_deref() == Some(name.as_str()),
        }
    }

    /// True when evaluating this fragment requires the team side of the join
    ///
    /// A count query can skip the join entirely when no fragment needs it.
    pub fn references_team(&self) -> bool {
        matches!(self, Self::TeamNameEq(_))
    }
}

/// Folds filter fragments with logical AND; empty input matches everything
pub fn matches_all(filters: &[MemberFilter], row: &MemberTeamDto) -> bool {
    filters.iter().all(|filter| filter.matches(row))
}

/// Sortable columns of the member/team projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberSortKey {
    Id,
    Username,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One caller-supplied sort key with direction
///
/// Null usernames sort last regardless of direction, so the placement rule
/// is the same one the SQL adapter spells as `NULLS LAST`. Every ordering is
/// made total by a final ascending id tiebreaker (see [`compare_rows`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberSort {
    pub key: MemberSortKey,
    pub direction: SortDirection,
}

impl MemberSort {
    pub fn asc(key: MemberSortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: MemberSortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

/// Total order over projection rows for the given sort keys
///
/// Ties fall through to the next key; the store-assigned id breaks any
/// remaining tie so repeated reads page identically.
pub fn compare_rows(a: &MemberTeamDto, b: &MemberTeamDto, sorts: &[MemberSort]) -> Ordering {
    for sort in sorts {
        let ord = match sort.key {
            MemberSortKey::Id => apply_direction(a.member_id.cmp(&b.member_id), sort.direction),
            MemberSortKey::Age => apply_direction(a.age.cmp(&b.age), sort.direction),
            MemberSortKey::Username => {
                cmp_nullable(a.username.as_deref(), b.username.as_deref(), sort.direction)
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.member_id.cmp(&b.member_id)
}

/// Sorts rows in place by the given keys, id-ascending tiebreak
pub fn sort_rows(rows: &mut [MemberTeamDto], sorts: &[MemberSort]) {
    rows.sort_by(|a, b| compare_rows(a, b, sorts));
}

fn apply_direction(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

// Nulls are placed last in both directions; only the non-null comparison
// is reversed for descending order.
fn cmp_nullable(a: Option<&str>, b: Option<&str>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => apply_direction(x.cmp(y), direction),
    }
}

/// Validated offset/limit pair for a paged search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: i64,
    limit: i64,
}

impl PageRequest {
    /// Upper bound on a single page
    pub const MAX_LIMIT: i64 = 500;

    /// Builds a page request
    ///
    /// # Business Rules Enforced
    /// - Offset must be non-negative
    /// - Limit must be between 1 and [`PageRequest::MAX_LIMIT`]
    pub fn new(offset: i64, limit: i64) -> DomainResult<Self> {
        if offset < 0 {
            return Err(DomainError::Validation {
                entity: "page",
                reason: format!("offset must be non-negative, got {}", offset),
            });
        }
        if limit < 1 || limit > Self::MAX_LIMIT {
            return Err(DomainError::Validation {
                entity: "page",
                reason: format!("limit must be between 1 and {}, got {}", Self::MAX_LIMIT, limit),
            });
        }

        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// One page of results plus the total match count
///
/// The total is computed by a separate count read so the data read's join
/// cost is not paid twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}
