//! Authorization policy: role rules per resource class

use serde::Serialize;

use crate::models::{Principal, Role};

/// Route classification supplied by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    Public,
    AuthenticatedOnly,
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Pure decision, no I/O
pub fn decide(principal: Option<&Principal>, class: ResourceClass) -> Decision {
    let allowed = match class {
        ResourceClass::Public => true,
        ResourceClass::AuthenticatedOnly => principal.is_some(),
        ResourceClass::AdminOnly => principal.map(|p| p.role == Role::Admin).unwrap_or(false),
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: 1,
            email: "user@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_public_allows_everyone() {
        assert_eq!(decide(None, ResourceClass::Public), Decision::Allow);
        assert_eq!(decide(Some(&principal(Role::Member)), ResourceClass::Public), Decision::Allow);
    }

    #[test]
    fn test_authenticated_only() {
        assert_eq!(decide(None, ResourceClass::AuthenticatedOnly), Decision::Deny);
        assert_eq!(
            decide(Some(&principal(Role::Member)), ResourceClass::AuthenticatedOnly),
            Decision::Allow
        );
        assert_eq!(
            decide(Some(&principal(Role::Admin)), ResourceClass::AuthenticatedOnly),
            Decision::Allow
        );
    }

    #[test]
    fn test_admin_only() {
        assert_eq!(decide(None, ResourceClass::AdminOnly), Decision::Deny);
        assert_eq!(decide(Some(&principal(Role::Member)), ResourceClass::AdminOnly), Decision::Deny);
        assert_eq!(decide(Some(&principal(Role::Admin)), ResourceClass::AdminOnly), Decision::Allow);
    }
}
