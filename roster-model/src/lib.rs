//! Core data model definitions shared across Roster crates.

pub mod error;
pub mod filter;
pub mod guard;
pub mod paged;
pub mod tag;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use filter::{
    FilterKey, FilterState, FilterUpdate, ProfessionFilter, SortDirection,
    SortSpec, PROFESSION_OPTIONS,
};
pub use guard::{RouteDecision, evaluate_route};
pub use paged::PagedResult;
pub use tag::{
    Tag, TagScope, detail_provides, list_provides, login_invalidates,
    mutation_invalidates, MutationKind,
};
pub use user::{Credentials, LoginOutcome, NewUser, Role, SessionState, User, UserPatch};
