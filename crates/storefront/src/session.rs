//! Session and capability gate.
//!
//! The storefront knows exactly one identity: a fixed demo administrator.
//! Logging in sets it, logging out clears it. There are no credentials.
//!
//! Privileged operations are gated by [`authorize`], which maps the
//! current role to a yes/no answer per [`Capability`].

use cannabiabuds_core::{Email, Role, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEMO_ADMIN_EMAIL: &str = "admin@cannabiabuds.com";

/// Session-held user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    /// Loyalty points balance. Display only.
    pub points: u32,
}

impl SessionUser {
    /// The fixed demo administrator every login produces.
    #[must_use]
    pub fn demo_admin() -> Self {
        Self {
            id: UserId::new("admin"),
            name: "Admin User".to_owned(),
            email: Email::from_static(DEMO_ADMIN_EMAIL),
            role: Role::Admin,
            points: 0,
        }
    }
}

/// Who is using the storefront right now.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    user: Option<SessionUser>,
}

impl SessionStore {
    /// A logged-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with the demo administrator and return it.
    ///
    /// Logging in twice is the same as logging in once.
    pub fn login(&mut self) -> &SessionUser {
        let user = self.user.insert(SessionUser::demo_admin());
        tracing::info!(user_id = %user.id, role = %user.role, "session started");
        user
    }

    /// Clear the session. A no-op when already logged out.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "session ended");
        }
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Role of the current user, if anyone is logged in.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Something the caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, update or delete catalog products.
    ManageCatalog,
    ViewAdminDashboard,
    Browse,
    ShopCart,
}

impl Capability {
    /// Every capability, privileged ones first.
    pub const ALL: [Self; 4] = [
        Self::ManageCatalog,
        Self::ViewAdminDashboard,
        Self::Browse,
        Self::ShopCart,
    ];

    /// Whether only administrators may exercise this capability.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::ManageCatalog | Self::ViewAdminDashboard)
    }
}

/// Outcome of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// A privileged operation was attempted without the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access denied: {capability:?} requires the admin role")]
pub struct AccessDenied {
    pub capability: Capability,
}

/// Decide whether `role` may exercise `capability`.
///
/// Privileged capabilities need [`Role::Admin`]; everything else is open,
/// including to anonymous visitors (`None`).
#[must_use]
pub const fn authorize(role: Option<Role>, capability: Capability) -> Access {
    if !capability.is_privileged() {
        return Access::Allow;
    }
    match role {
        Some(Role::Admin) => Access::Allow,
        Some(Role::Customer) | None => Access::Deny,
    }
}

/// The capabilities `role` holds, in [`Capability::ALL`] order.
///
/// Clients use this to decide what to show (the admin dashboard link, the
/// product editor) instead of comparing roles themselves.
pub fn granted(role: Option<Role>) -> impl Iterator<Item = Capability> {
    Capability::ALL
        .into_iter()
        .filter(move |&capability| authorize(role, capability).is_allowed())
}

/// [`authorize`] as a `Result`, for use with `?`.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the gate says no.
pub const fn require(role: Option<Role>, capability: Capability) -> Result<(), AccessDenied> {
    match authorize(role, capability) {
        Access::Allow => Ok(()),
        Access::Deny => Err(AccessDenied { capability }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_sets_fixed_admin() {
        let mut session = SessionStore::new();
        assert!(session.current_user().is_none());

        let user = session.login().clone();
        assert_eq!(user.id.as_str(), "admin");
        assert_eq!(user.name, "Admin User");
        assert_eq!(user.email.as_str(), "admin@cannabiabuds.com");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.points, 0);
        assert_eq!(session.current_role(), Some(Role::Admin));
    }

    #[test]
    fn test_login_is_idempotent() {
        let mut session = SessionStore::new();
        let first = session.login().clone();
        let second = session.login().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_logout_clears_and_is_idempotent() {
        let mut session = SessionStore::new();
        session.login();
        session.logout();
        assert!(!session.is_logged_in());
        session.logout();
        assert_eq!(session.current_role(), None);
    }

    #[test]
    fn test_privileged_capabilities_need_admin() {
        for capability in [Capability::ManageCatalog, Capability::ViewAdminDashboard] {
            assert_eq!(authorize(None, capability), Access::Deny);
            assert_eq!(authorize(Some(Role::Customer), capability), Access::Deny);
            assert_eq!(authorize(Some(Role::Admin), capability), Access::Allow);
        }
    }

    #[test]
    fn test_open_capabilities_allow_anonymous() {
        for capability in [Capability::Browse, Capability::ShopCart] {
            assert!(authorize(None, capability).is_allowed());
            assert!(authorize(Some(Role::Customer), capability).is_allowed());
        }
    }

    #[test]
    fn test_require_reports_capability() {
        let err = require(None, Capability::ManageCatalog).unwrap_err();
        assert_eq!(err.capability, Capability::ManageCatalog);
        assert!(require(Some(Role::Admin), Capability::ManageCatalog).is_ok());
    }

    #[test]
    fn test_granted_capabilities_per_role() {
        let open = [Capability::Browse, Capability::ShopCart];
        assert_eq!(granted(None).collect::<Vec<_>>(), open);
        assert_eq!(granted(Some(Role::Customer)).collect::<Vec<_>>(), open);
        assert_eq!(granted(Some(Role::Admin)).collect::<Vec<_>>(), Capability::ALL);
    }

    #[test]
    fn test_demo_admin_email_is_normalised() {
        let user = SessionUser::demo_admin();
        assert_eq!(user.email, Email::parse(DEMO_ADMIN_EMAIL).unwrap());
    }
}
