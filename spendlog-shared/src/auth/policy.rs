/// Route authorization policy
///
/// A single ordered table maps (HTTP method, path pattern) to a required
/// access level. The table is evaluated in listed order, first match wins,
/// and is enforced centrally by the auth middleware before any handler runs.
/// Route handlers never carry their own role checks.
///
/// Path patterns are segment-based: a literal matches itself, `*` matches
/// exactly one segment, and a trailing `**` matches the rest of the path
/// (including an empty rest).
///
/// # Table
///
/// ```text
/// GET  /api/auth/me               authenticated
/// any  /api/auth/**               public
/// GET  /health                    public
/// any  /api/users/**              USER or ADMIN
/// GET  /api/expense-categories/** authenticated
/// any  /api/expense-categories/** ADMIN            (mutations)
/// any  /api/expenses/**           authenticated
/// (default)                       deny
/// ```

use axum::http::Method;

use crate::models::credential::Role;

/// Access level required by a policy rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token required
    Public,

    /// Any valid token
    Authenticated,

    /// Valid token with one of the listed roles
    AnyRole(&'static [Role]),
}

/// One row of the policy table
#[derive(Debug, Clone, Copy)]
pub struct PolicyRule {
    /// Restrict the rule to one HTTP method; None matches every method
    pub method: Option<&'static Method>,

    /// Segment pattern the request path must match
    pub pattern: &'static str,

    /// Required access level when the rule matches
    pub access: Access,
}

/// The static route policy table, evaluated top to bottom
///
/// Category reads come before the admin-only catch-all for the same prefix,
/// so GET stays open to any authenticated identity while mutations require
/// ADMIN.
pub const POLICY_TABLE: &[PolicyRule] = &[
    // /me needs an identity, so it is carved out before the public auth rule
    PolicyRule {
        method: Some(&Method::GET),
        pattern: "/api/auth/me",
        access: Access::Authenticated,
    },
    PolicyRule {
        method: None,
        pattern: "/api/auth/**",
        access: Access::Public,
    },
    PolicyRule {
        method: Some(&Method::GET),
        pattern: "/health",
        access: Access::Public,
    },
    PolicyRule {
        method: None,
        pattern: "/api/users/**",
        access: Access::AnyRole(&[Role::User, Role::Admin]),
    },
    PolicyRule {
        method: Some(&Method::GET),
        pattern: "/api/expense-categories/**",
        access: Access::Authenticated,
    },
    PolicyRule {
        method: None,
        pattern: "/api/expense-categories/**",
        access: Access::AnyRole(&[Role::Admin]),
    },
    PolicyRule {
        method: None,
        pattern: "/api/expenses/**",
        access: Access::Authenticated,
    },
];

/// Outcome of evaluating the policy table for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Matched a public rule; skip token validation
    Allow,

    /// Matched a rule that requires any authenticated identity
    RequireAuthenticated,

    /// Matched a rule that requires one of these roles
    RequireRole(&'static [Role]),
}

/// Evaluates the policy table for a method/path pair
///
/// Unmatched requests fall through to the default-deny rule and require
/// authentication, mirroring an `anyRequest().authenticated()` tail.
pub fn evaluate(method: &Method, path: &str) -> Decision {
    for rule in POLICY_TABLE {
        if let Some(m) = rule.method {
            if m != method {
                continue;
            }
        }
        if matches_pattern(rule.pattern, path) {
            return match rule.access {
                Access::Public => Decision::Allow,
                Access::Authenticated => Decision::RequireAuthenticated,
                Access::AnyRole(roles) => Decision::RequireRole(roles),
            };
        }
    }

    // Default: deny unauthenticated access to anything unmatched
    Decision::RequireAuthenticated
}

/// Checks whether `role` satisfies a decision
///
/// `Allow` always passes; role rules pass when the role is listed.
pub fn role_permitted(decision: Decision, role: Role) -> bool {
    match decision {
        Decision::Allow | Decision::RequireAuthenticated => true,
        Decision::RequireRole(roles) => roles.contains(&role),
    }
}

/// Segment-wise pattern match
///
/// `*` matches exactly one segment, a trailing `**` matches the remainder of
/// the path (possibly empty). Patterns and paths are split on `/`.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    let mut pat_segments = pattern.trim_start_matches('/').split('/').peekable();
    let mut path_segments = path.trim_start_matches('/').split('/').filter(|s| !s.is_empty());

    loop {
        match pat_segments.next() {
            Some("**") => return true,
            Some("*") => {
                if path_segments.next().is_none() {
                    return false;
                }
            }
            Some(literal) => match path_segments.next() {
                Some(segment) if segment == literal => {}
                _ => return false,
            },
            None => return path_segments.next().is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_literal() {
        assert!(matches_pattern("/health", "/health"));
        assert!(!matches_pattern("/health", "/healthz"));
        assert!(!matches_pattern("/health", "/health/db"));
    }

    #[test]
    fn test_pattern_single_wildcard() {
        assert!(matches_pattern("/api/users/*", "/api/users/42"));
        assert!(!matches_pattern("/api/users/*", "/api/users"));
        assert!(!matches_pattern("/api/users/*", "/api/users/42/exists"));
    }

    #[test]
    fn test_pattern_rest_wildcard() {
        assert!(matches_pattern("/api/auth/**", "/api/auth/login"));
        assert!(matches_pattern("/api/auth/**", "/api/auth"));
        assert!(matches_pattern("/api/expenses/**", "/api/expenses/total/date-range"));
        assert!(!matches_pattern("/api/auth/**", "/api/users"));
    }

    #[test]
    fn test_auth_routes_are_public() {
        assert_eq!(
            evaluate(&Method::POST, "/api/auth/register"),
            Decision::Allow
        );
        assert_eq!(evaluate(&Method::POST, "/api/auth/login"), Decision::Allow);
        assert_eq!(evaluate(&Method::GET, "/health"), Decision::Allow);
    }

    #[test]
    fn test_me_requires_authentication() {
        assert_eq!(
            evaluate(&Method::GET, "/api/auth/me"),
            Decision::RequireAuthenticated
        );
        // The carve-out is GET-only; other methods fall to the public rule
        assert_eq!(evaluate(&Method::POST, "/api/auth/logout"), Decision::Allow);
    }

    #[test]
    fn test_health_is_public_only_for_get() {
        assert_eq!(
            evaluate(&Method::POST, "/health"),
            Decision::RequireAuthenticated
        );
    }

    #[test]
    fn test_person_routes_require_user_or_admin() {
        let decision = evaluate(&Method::GET, "/api/users/some-id");
        match decision {
            Decision::RequireRole(roles) => {
                assert!(roles.contains(&Role::User));
                assert!(roles.contains(&Role::Admin));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_category_reads_open_to_authenticated() {
        assert_eq!(
            evaluate(&Method::GET, "/api/expense-categories"),
            Decision::RequireAuthenticated
        );
        assert_eq!(
            evaluate(&Method::GET, "/api/expense-categories/active"),
            Decision::RequireAuthenticated
        );
    }

    #[test]
    fn test_category_mutations_are_admin_only() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            match evaluate(&method, "/api/expense-categories") {
                Decision::RequireRole(roles) => assert_eq!(roles, &[Role::Admin]),
                other => panic!("unexpected decision for {}: {:?}", method, other),
            }
        }
    }

    #[test]
    fn test_expense_routes_require_authentication() {
        assert_eq!(
            evaluate(&Method::POST, "/api/expenses"),
            Decision::RequireAuthenticated
        );
        assert_eq!(
            evaluate(&Method::GET, "/api/expenses/recent"),
            Decision::RequireAuthenticated
        );
    }

    #[test]
    fn test_unmatched_routes_default_to_deny() {
        assert_eq!(
            evaluate(&Method::GET, "/metrics"),
            Decision::RequireAuthenticated
        );
    }

    #[test]
    fn test_role_permitted() {
        assert!(role_permitted(Decision::Allow, Role::User));
        assert!(role_permitted(Decision::RequireAuthenticated, Role::User));
        assert!(role_permitted(
            Decision::RequireRole(&[Role::Admin]),
            Role::Admin
        ));
        assert!(!role_permitted(
            Decision::RequireRole(&[Role::Admin]),
            Role::User
        ));
    }
}
