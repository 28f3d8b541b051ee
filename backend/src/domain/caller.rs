//! Explicit caller context passed into every procedure.
//!
//! Procedures never reach for ambient request state; the inbound adapter
//! resolves the session into a [`Caller`] and the guards below decide access.

use super::{Error, Role, User, UserId};

/// Message returned when a protected procedure runs without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You have to log in to access it.";
/// Message returned when an admin-only procedure runs for a non-admin.
pub const ADMIN_REQUIRED_MESSAGE: &str = "You have to log in as an admin to access it.";

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    user: User,
}

impl CallerIdentity {
    #[must_use]
    pub fn id(&self) -> &UserId {
        self.user.id()
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Fail with `FORBIDDEN` and `message` unless `owner` is this caller.
    ///
    /// ```
    /// use folio::domain::{Caller, Role, User, UserId};
    ///
    /// let alice = User::new(UserId::new("alice").unwrap(), None, None, Role::User);
    /// let caller = Caller::authenticated(alice);
    /// let identity = caller.require_authenticated().unwrap();
    /// assert!(identity.require_owner(&UserId::new("alice").unwrap(), "nope").is_ok());
    /// assert!(identity.require_owner(&UserId::new("bob").unwrap(), "nope").is_err());
    /// ```
    pub fn require_owner(&self, owner: &UserId, message: &str) -> Result<(), Error> {
        if self.id() == owner {
            Ok(())
        } else {
            Err(Error::forbidden(message))
        }
    }
}

/// Who is calling a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    Authenticated(CallerIdentity),
    #[default]
    Anonymous,
}

impl Caller {
    /// Wrap a resolved user.
    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self::Authenticated(CallerIdentity { user })
    }

    #[must_use]
    pub fn identity(&self) -> Option<&CallerIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }

    /// Fail with `UNAUTHORIZED` for anonymous callers.
    pub fn require_authenticated(&self) -> Result<&CallerIdentity, Error> {
        self.identity()
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED_MESSAGE))
    }

    /// Fail with `UNAUTHORIZED` for anonymous callers and `FORBIDDEN` for
    /// anyone without the admin role.
    pub fn require_admin(&self) -> Result<&CallerIdentity, Error> {
        let identity = self.require_authenticated()?;
        match identity.user().role() {
            Role::Admin => Ok(identity),
            Role::User => Err(Error::forbidden(ADMIN_REQUIRED_MESSAGE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    fn user(id: &str, role: Role) -> User {
        User::new(UserId::new(id).expect("valid id"), None, None, role)
    }

    #[fixture]
    fn alice() -> Caller {
        Caller::authenticated(user("alice", Role::User))
    }

    #[rstest]
    fn anonymous_is_unauthorised() {
        let error = Caller::Anonymous
            .require_authenticated()
            .expect_err("anonymous caller");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), LOGIN_REQUIRED_MESSAGE);
    }

    #[rstest]
    fn authenticated_exposes_identity(alice: Caller) {
        let identity = alice.require_authenticated().expect("authenticated");
        assert_eq!(identity.id().as_ref(), "alice");
    }

    #[rstest]
    fn non_owner_is_forbidden_with_message(alice: Caller) {
        let identity = alice.require_authenticated().expect("authenticated");
        let bob = UserId::new("bob").expect("valid id");
        let error = identity
            .require_owner(&bob, "You are not allowed to update this article")
            .expect_err("not the owner");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), "You are not allowed to update this article");
    }

    #[rstest]
    fn admin_guard_checks_the_role(alice: Caller) {
        let error = alice.require_admin().expect_err("plain user");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), ADMIN_REQUIRED_MESSAGE);

        let root = Caller::authenticated(user("root", Role::Admin));
        let identity = root.require_admin().expect("admin");
        assert_eq!(identity.id().as_ref(), "root");
    }

    #[rstest]
    fn admin_guard_asks_anonymous_callers_to_log_in() {
        let error = Caller::Anonymous.require_admin().expect_err("anonymous");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), LOGIN_REQUIRED_MESSAGE);
    }
}
