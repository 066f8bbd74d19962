// Member domain module
// Contains the member entity and the conditional search types

pub mod member;
pub mod search;

// Re-export main types for convenience
pub use member::{Member, NewMember};
pub use search::{
    MemberFilter, MemberSearchCondition, MemberSort, MemberSortKey, MemberTeamDto, PageRequest,
    PageResponse, SortDirection,
};
