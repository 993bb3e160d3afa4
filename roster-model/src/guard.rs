//! Route guarding decisions.

use crate::user::{Role, SessionState};

/// Outcome of guarding a view subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the guarded subtree.
    Allow,
    /// Not authenticated; send the user to the login view.
    RedirectToLogin,
    /// Authenticated but lacking a required role.
    RedirectToUnauthorized,
}

/// Decide whether the current session may enter a guarded route.
///
/// `required_roles: None` means any authenticated session is allowed.
pub fn evaluate_route(
    session: &SessionState,
    required_roles: Option<&[Role]>,
) -> RouteDecision {
    if !session.is_authenticated() {
        return RouteDecision::RedirectToLogin;
    }

    if let Some(required) = required_roles
        && let Some(role) = session.role
        && !required.contains(&role)
    {
        return RouteDecision::RedirectToUnauthorized;
    }

    RouteDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_redirects_to_login() {
        let session = SessionState::default();
        assert_eq!(
            evaluate_route(&session, None),
            RouteDecision::RedirectToLogin
        );
        assert_eq!(
            evaluate_route(&session, Some(&[Role::Admin])),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn authenticated_without_role_requirement_is_allowed() {
        let session = SessionState::authenticated("tok".into(), Role::User);
        assert_eq!(evaluate_route(&session, None), RouteDecision::Allow);
    }

    #[test]
    fn missing_required_role_redirects_to_unauthorized() {
        let session = SessionState::authenticated("tok".into(), Role::User);
        assert_eq!(
            evaluate_route(&session, Some(&[Role::Admin])),
            RouteDecision::RedirectToUnauthorized
        );
    }

    #[test]
    fn matching_role_is_allowed() {
        let session = SessionState::authenticated("tok".into(), Role::Admin);
        assert_eq!(
            evaluate_route(&session, Some(&[Role::Admin, Role::User])),
            RouteDecision::Allow
        );
    }
}
