//! Asynchronous client for the Roster admin console.
//!
//! Everything the console's views need short of rendering: an
//! authenticated [`ApiClient`] for the collection server, the
//! [`UserDirectory`] service with its tag-aware query cache, the
//! [`AuthService`] login flow, observable [`SessionStore`] and
//! [`FilterStore`] state containers, durable session storage, and the
//! input [`Debouncer`].
//!
//! [`ApiClient`]: api_client::ApiClient
//! [`UserDirectory`]: users::UserDirectory
//! [`AuthService`]: auth::AuthService
//! [`SessionStore`]: session::SessionStore
//! [`FilterStore`]: filters::FilterStore
//! [`Debouncer`]: debounce::Debouncer

pub mod api_client;
pub mod auth;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod session;
pub mod users;

pub use api_client::ApiClient;
pub use auth::{AuthService, HttpAuthService, validate_credentials};
pub use cache::{Freshness, QueryCache, QueryKey};
pub use config::ClientConfig;
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use error::{ClientError, ClientResult};
pub use filters::{FilterStore, FilterSubscriber};
pub use session::{
    FileVault, MemoryVault, SessionStore, SessionSubscriber, SessionVault,
    StoredSession,
};
pub use users::UserDirectory;

pub use roster_model as model;
