//! Cache invalidation tags.
//!
//! Query results register themselves under tags; mutations name the tags
//! they invalidate. The cache intersects the two so dependent queries
//! refresh without the presentation layer triggering refetches by hand.
//! All computations here are pure functions of the operation's kind,
//! arguments, and outcome.

use crate::user::User;

/// What a tag points at within its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagScope {
    /// The whole collection; any list query depends on it.
    Collection,
    /// One entity by id.
    Entity(u64),
}

/// An invalidation key attached to cached query results and mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Users(TagScope),
    Auth,
}

impl Tag {
    pub fn users_collection() -> Self {
        Tag::Users(TagScope::Collection)
    }

    pub fn user(id: u64) -> Self {
        Tag::Users(TagScope::Entity(id))
    }
}

/// Mutations that can invalidate cached query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update { id: u64 },
    Delete { id: u64 },
}

/// Tags a list query registers itself under.
///
/// A successful result provides the collection tag plus one tag per row,
/// so a row-level invalidation refreshes every list that showed the row.
/// Errored or empty results provide only the collection tag.
pub fn list_provides(rows: Option<&[User]>) -> Vec<Tag> {
    match rows {
        Some(rows) => {
            let mut tags = Vec::with_capacity(rows.len() + 1);
            tags.push(Tag::users_collection());
            tags.extend(rows.iter().map(|row| Tag::user(row.id)));
            tags
        }
        None => vec![Tag::users_collection()],
    }
}

/// Tags a detail query registers itself under.
pub fn detail_provides(id: u64) -> Vec<Tag> {
    vec![Tag::user(id)]
}

/// Tags a mutation invalidates.
///
/// Create and delete touch only the collection: readers must refetch the
/// list, and per-row tags for deleted or unseen rows are not separately
/// invalidated. Update also touches the row so an open detail view
/// refreshes alongside the list.
pub fn mutation_invalidates(kind: MutationKind) -> Vec<Tag> {
    match kind {
        MutationKind::Create | MutationKind::Delete { .. } => {
            vec![Tag::users_collection()]
        }
        MutationKind::Update { id } => {
            vec![Tag::users_collection(), Tag::user(id)]
        }
    }
}

/// Tags invalidated by a (re)login. No row-level granularity.
pub fn login_invalidates() -> Vec<Tag> {
    vec![Tag::Auth]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;

    fn row(id: u64) -> User {
        User {
            id,
            name: format!("user-{id}"),
            surname: "Test".into(),
            email: format!("user{id}@example.com"),
            profession: "Analist".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            role: Role::User,
            tckn_prefix: String::new(),
        }
    }

    #[test]
    fn list_of_three_rows_provides_four_tags() {
        let rows = [row(1), row(2), row(3)];
        let tags = list_provides(Some(&rows));
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[0], Tag::users_collection());
        assert!(tags.contains(&Tag::user(1)));
        assert!(tags.contains(&Tag::user(2)));
        assert!(tags.contains(&Tag::user(3)));
    }

    #[test]
    fn errored_or_empty_list_provides_collection_only() {
        assert_eq!(list_provides(None), vec![Tag::users_collection()]);
        assert_eq!(list_provides(Some(&[])), vec![Tag::users_collection()]);
    }

    #[test]
    fn detail_provides_row_tag() {
        assert_eq!(detail_provides(9), vec![Tag::user(9)]);
    }

    #[test]
    fn create_and_delete_invalidate_collection_only() {
        assert_eq!(
            mutation_invalidates(MutationKind::Create),
            vec![Tag::users_collection()]
        );
        assert_eq!(
            mutation_invalidates(MutationKind::Delete { id: 7 }),
            vec![Tag::users_collection()]
        );
    }

    #[test]
    fn update_invalidates_collection_and_row() {
        let tags = mutation_invalidates(MutationKind::Update { id: 5 });
        assert_eq!(tags, vec![Tag::users_collection(), Tag::user(5)]);
    }

    #[test]
    fn login_invalidates_auth_scope() {
        assert_eq!(login_invalidates(), vec![Tag::Auth]);
    }
}
