//! End-to-end console flows that cross module boundaries: session
//! restore across restarts, filter transitions feeding the query
//! translator, tag invalidation over cached pages, and debounced text
//! input driving the filter store.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use roster_client::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use roster_client::filters::{FilterStore, FilterSubscriber};
use roster_client::session::{FileVault, SessionStore, SessionVault, StoredSession};
use roster_model::{
    FilterState, FilterUpdate, MutationKind, PagedResult, ProfessionFilter, Role,
    RouteDecision, Tag, User, evaluate_route, list_provides, mutation_invalidates,
};

fn user(id: u64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        surname: "Test".to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
        profession: "Geliştirici".to_string(),
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
        role: Role::User,
        tckn_prefix: String::new(),
    }
}

#[test]
fn session_survives_a_restart_through_the_file_vault() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    // First run: log in, session is persisted.
    {
        let store = SessionStore::new(Arc::new(FileVault::at_path(path.clone())));
        assert!(!store.is_authenticated());
        store.set_auth("tok-abc".into(), Role::Admin).unwrap();
    }

    // Second run: state restored from disk, admin routes allowed.
    let store = SessionStore::new(Arc::new(FileVault::at_path(path.clone())));
    let state = store.snapshot();
    assert_eq!(state.token.as_deref(), Some("tok-abc"));
    assert_eq!(state.role, Some(Role::Admin));
    assert_eq!(
        evaluate_route(&state, Some(&[Role::Admin])),
        RouteDecision::Allow
    );

    // Logout clears the file too; a third run starts unauthenticated.
    store.logout().unwrap();
    let store = SessionStore::new(Arc::new(FileVault::at_path(path)));
    assert!(!store.is_authenticated());
    assert_eq!(
        evaluate_route(&store.snapshot(), None),
        RouteDecision::RedirectToLogin
    );
}

#[test]
fn restored_role_still_gates_restricted_routes() {
    let dir = tempfile::tempdir().unwrap();
    let vault = FileVault::at_path(dir.path().join("session.json"));
    vault
        .store(&StoredSession::new("tok-user".into(), Role::User))
        .unwrap();

    let store = SessionStore::new(Arc::new(vault));
    let state = store.snapshot();
    assert_eq!(evaluate_route(&state, None), RouteDecision::Allow);
    assert_eq!(
        evaluate_route(&state, Some(&[Role::Admin])),
        RouteDecision::RedirectToUnauthorized
    );
}

#[test]
fn filter_transitions_render_the_expected_query_strings() {
    let store = FilterStore::new();
    assert_eq!(
        store.snapshot().to_query_string(),
        "_page=1&_limit=10&_sort=id&_order=asc"
    );

    // Paging forward keeps everything else; _page is 1-based on the wire.
    store.set_page(2);
    assert_eq!(
        store.snapshot().to_query_string(),
        "_page=3&_limit=10&_sort=id&_order=asc"
    );

    // A filter change restarts from the first page.
    store.set_filter(FilterUpdate::Profession(ProfessionFilter::from(
        "Geliştirici",
    )));
    assert_eq!(
        store.snapshot().to_query_string(),
        "_page=1&_limit=10&_sort=id&_order=asc&profession=Geli%C5%9Ftirici"
    );

    store.set_sort("createdAt:desc");
    assert_eq!(
        store.snapshot().to_query_string(),
        "_page=1&_limit=10&_sort=createdAt&_order=desc&profession=Geli%C5%9Ftirici"
    );

    store.reset();
    assert_eq!(store.snapshot(), FilterState::default());
}

#[test]
fn a_delete_marks_every_cached_page_stale_but_readable() {
    use roster_client::cache::{Freshness, QueryCache, QueryKey};

    let cache: QueryCache<PagedResult<User>> = QueryCache::new();
    let filter = FilterState::default();
    let key = QueryKey::new("users", filter.to_query_string());

    let rows = vec![user(1, "Ayşe"), user(2, "Mehmet")];
    let page = PagedResult::from_parts(rows, Some("17"));
    assert_eq!(page.total_count, 17);

    let ticket = cache.begin_fetch();
    assert!(cache.commit(
        key.clone(),
        page.clone(),
        list_provides(Some(&page.data)),
        ticket
    ));
    assert!(cache.get_fresh(&key).is_some());

    cache.invalidate(&mutation_invalidates(MutationKind::Delete { id: 2 }));

    // The page is no longer served as fresh, but stays visible as a
    // fallback until a refetch recommits it.
    assert!(cache.get_fresh(&key).is_none());
    let (stale, freshness) = cache.get_any(&key).unwrap();
    assert_eq!(freshness, Freshness::Stale);
    assert_eq!(stale.data.len(), 2);

    let refetch = cache.begin_fetch();
    let after = PagedResult::from_parts(vec![user(1, "Ayşe")], Some("16"));
    assert!(cache.commit(
        key.clone(),
        after,
        list_provides(Some(&[user(1, "Ayşe")])),
        refetch
    ));
    assert_eq!(cache.get_fresh(&key).unwrap().total_count, 16);
}

#[test]
fn unrelated_detail_entries_survive_a_row_update() {
    use roster_client::cache::QueryCache;
    use roster_model::detail_provides;

    let details: QueryCache<User> = QueryCache::new();
    for id in [3u64, 4] {
        let ticket = details.begin_fetch();
        details.commit(
            roster_client::cache::QueryKey::new("users", id.to_string()),
            user(id, "Row"),
            detail_provides(id),
            ticket,
        );
    }

    details.invalidate(&mutation_invalidates(MutationKind::Update { id: 3 }));

    let key3 = roster_client::cache::QueryKey::new("users", "3");
    let key4 = roster_client::cache::QueryKey::new("users", "4");
    assert!(details.get_fresh(&key3).is_none());
    assert!(details.get_fresh(&key4).is_some());

    // A delete touches only the collection tag, never other rows.
    details.invalidate(&mutation_invalidates(MutationKind::Delete { id: 4 }));
    assert!(details.get_fresh(&key4).is_some());
    assert_eq!(
        mutation_invalidates(MutationKind::Delete { id: 4 }),
        vec![Tag::users_collection()]
    );
}

#[derive(Default)]
struct CountingSubscriber {
    seen: Mutex<Vec<FilterState>>,
}

impl FilterSubscriber for CountingSubscriber {
    fn on_filters_changed(&self, state: &FilterState) {
        self.seen.lock().push(state.clone());
    }
}

#[tokio::test(start_paused = true)]
async fn debounced_typing_applies_only_the_settled_value() {
    let store = Arc::new(FilterStore::new());
    let subscriber = Arc::new(CountingSubscriber::default());
    store.subscribe(Arc::downgrade(&subscriber) as Weak<dyn FilterSubscriber>);
    store.set_page(3);

    let sink = Arc::clone(&store);
    let debouncer = Debouncer::new(DEFAULT_DEBOUNCE, move |name: String| {
        sink.set_filter(FilterUpdate::Name(name));
    });

    // A typing burst: only the final value reaches the store.
    debouncer.submit("A".to_string());
    debouncer.submit("Ah".to_string());
    debouncer.submit("Ahmet".to_string());
    tokio::time::sleep(Duration::from_millis(600)).await;

    let state = store.snapshot();
    assert_eq!(state.name, "Ahmet");
    assert_eq!(state.page, 0);
    // One notification for set_page, one for the settled filter update.
    assert_eq!(subscriber.seen.lock().len(), 2);
}
