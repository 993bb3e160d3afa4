//! User collection service: queries and mutations wired through the
//! tag-aware cache.

use log::{debug, warn};
use roster_model::{
    FilterState, MutationKind, NewUser, PagedResult, Tag, User, UserPatch,
    detail_provides, list_provides, mutation_invalidates,
};

use crate::api_client::ApiClient;
use crate::cache::{Freshness, QueryCache, QueryKey};
use crate::error::ClientResult;

const USERS_PATH: &str = "users";

/// Client-side view of the user collection.
///
/// List and detail results are cached under the tags they provide;
/// mutations invalidate tags so dependent queries refetch on their next
/// read instead of the caller refreshing by hand.
#[derive(Debug)]
pub struct UserDirectory {
    api: ApiClient,
    lists: QueryCache<PagedResult<User>>,
    details: QueryCache<User>,
}

impl UserDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            lists: QueryCache::new(),
            details: QueryCache::new(),
        }
    }

    /// Fetch one page of users for the given filter state.
    ///
    /// Serves a fresh cached page when one exists; otherwise fetches,
    /// normalizes the `X-Total-Count` header, and commits the page under
    /// its provided tags. Identical concurrent calls share one fetch; a
    /// call whose filter arguments were superseded mid-flight still
    /// returns its page but does not overwrite the newer cache entry.
    pub async fn list(&self, filter: &FilterState) -> ClientResult<PagedResult<User>> {
        let key = QueryKey::new(USERS_PATH, filter.to_query_string());
        if let Some(hit) = self.lists.get_fresh(&key) {
            debug!("[UserDirectory] List served from cache");
            return Ok(hit);
        }

        let flight = self.lists.flight(&key);
        let _guard = flight.lock().await;
        if let Some(hit) = self.lists.get_fresh(&key) {
            return Ok(hit);
        }

        let ticket = self.lists.begin_fetch();
        let pairs = filter.to_query_pairs();
        let fetched = self
            .api
            .get_with_query::<Vec<User>>(USERS_PATH, &pairs)
            .await;

        let (rows, total_count) = match fetched {
            Ok(parts) => parts,
            Err(e) => {
                // Prior cached data, stale or not, stays visible.
                warn!("[UserDirectory] List fetch failed: {e}");
                return Err(e);
            }
        };

        if total_count.is_none() {
            debug!("[UserDirectory] Response missing total-count header, defaulting to 0");
        }
        let page = PagedResult::from_parts(rows, total_count.as_deref());

        let tags = list_provides(Some(&page.data));
        if !self.lists.commit(key, page.clone(), tags, ticket) {
            debug!("[UserDirectory] List result superseded, not cached");
        }
        Ok(page)
    }

    /// Fetch a single user by id.
    pub async fn get(&self, id: u64) -> ClientResult<User> {
        let key = QueryKey::new(USERS_PATH, id.to_string());
        if let Some(hit) = self.details.get_fresh(&key) {
            return Ok(hit);
        }

        let flight = self.details.flight(&key);
        let _guard = flight.lock().await;
        if let Some(hit) = self.details.get_fresh(&key) {
            return Ok(hit);
        }

        let ticket = self.details.begin_fetch();
        let user: User = self.api.get(&format!("{USERS_PATH}/{id}")).await?;
        self.details
            .commit(key, user.clone(), detail_provides(id), ticket);
        Ok(user)
    }

    /// Create a user. Invalidates the collection so lists refetch.
    pub async fn create(&self, new_user: &NewUser) -> ClientResult<User> {
        let created: User = self.api.post(USERS_PATH, new_user).await?;
        self.invalidate(&mutation_invalidates(MutationKind::Create));
        Ok(created)
    }

    /// Patch a user. Invalidates the collection and the row, so an open
    /// detail view refreshes alongside the list.
    pub async fn update(&self, id: u64, patch: &UserPatch) -> ClientResult<User> {
        let updated: User = self
            .api
            .patch(&format!("{USERS_PATH}/{id}"), patch)
            .await?;
        self.invalidate(&mutation_invalidates(MutationKind::Update { id }));
        Ok(updated)
    }

    /// Delete a user. Invalidates the collection only; per-row tags for
    /// deleted rows are not separately invalidated.
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api
            .delete_no_content(&format!("{USERS_PATH}/{id}"))
            .await?;
        self.invalidate(&mutation_invalidates(MutationKind::Delete { id }));
        Ok(())
    }

    /// Mark every cached result registered under any of these tags stale.
    pub fn invalidate(&self, tags: &[Tag]) {
        self.lists.invalidate(tags);
        self.details.invalidate(tags);
    }

    /// Drop all cached results. Used on logout.
    pub fn clear_cache(&self) {
        self.lists.clear();
        self.details.clear();
    }

    /// Cached page for a filter state, with its freshness. Stale pages
    /// back the error view's "prior data stays visible" behavior.
    pub fn cached_list(
        &self,
        filter: &FilterState,
    ) -> Option<(PagedResult<User>, Freshness)> {
        let key = QueryKey::new(USERS_PATH, filter.to_query_string());
        self.lists.get_any(&key)
    }

    /// Cached detail record for an id, with its freshness.
    pub fn cached_user(&self, id: u64) -> Option<(User, Freshness)> {
        let key = QueryKey::new(USERS_PATH, id.to_string());
        self.details.get_any(&key)
    }
}
