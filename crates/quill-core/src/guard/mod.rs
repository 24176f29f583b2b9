//! Authorization guards.
//!
//! A guard is an ordered pipeline of predicate checks evaluated against the
//! acting principal. Evaluation stops at the first failing check, so the
//! denial always names the most basic requirement that was not met.
//! Guards hold no state and never touch the store.

pub mod account;
pub mod comment;
pub mod post;

use uuid::Uuid;

use crate::error::DomainError;
use crate::principal::Principal;

/// A single predicate in a guard pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The principal is logged in.
    Authenticated,
    /// The principal's account is active.
    Active,
    /// The principal is the given record owner.
    Owner(Uuid),
}

impl Check {
    fn evaluate(self, principal: &Principal) -> Option<Denial> {
        let passed = match self {
            Check::Authenticated => principal.is_authenticated(),
            Check::Active => principal.is_active(),
            Check::Owner(owner) => principal.is(owner),
        };
        (!passed).then(|| match self {
            Check::Authenticated => Denial::NotAuthenticated,
            Check::Active => Denial::Inactive,
            Check::Owner(_) => Denial::NotOwner,
        })
    }
}

/// Why a guard refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAuthenticated,
    Inactive,
    NotOwner,
}

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turn a denial into the matching domain error.
    ///
    /// `action` names what was attempted, e.g. `"update this post"`.
    pub fn ensure(self, action: &str) -> Result<(), DomainError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::NotAuthenticated) => Err(DomainError::Unauthenticated),
            Decision::Deny(Denial::Inactive) => Err(DomainError::PermissionDenied(format!(
                "inactive accounts may not {action}"
            ))),
            Decision::Deny(Denial::NotOwner) => Err(DomainError::PermissionDenied(format!(
                "only the author may {action}"
            ))),
        }
    }
}

/// Ordered list of checks.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    checks: Vec<Check>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn evaluate(&self, principal: &Principal) -> Decision {
        self.checks
            .iter()
            .find_map(|check| check.evaluate(principal))
            .map_or(Decision::Allow, Decision::Deny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Uuid, is_active: bool) -> Principal {
        Principal::User {
            id,
            is_active,
            session_id: None,
        }
    }

    #[test]
    fn empty_pipeline_allows_everyone() {
        assert_eq!(Pipeline::new().evaluate(&Principal::Anonymous), Decision::Allow);
    }

    #[test]
    fn first_failing_check_wins() {
        let owner = Uuid::new_v4();
        let pipeline = Pipeline::new()
            .then(Check::Authenticated)
            .then(Check::Active)
            .then(Check::Owner(owner));

        assert_eq!(
            pipeline.evaluate(&Principal::Anonymous),
            Decision::Deny(Denial::NotAuthenticated)
        );
        assert_eq!(
            pipeline.evaluate(&user(Uuid::new_v4(), false)),
            Decision::Deny(Denial::Inactive)
        );
        assert_eq!(
            pipeline.evaluate(&user(Uuid::new_v4(), true)),
            Decision::Deny(Denial::NotOwner)
        );
        assert_eq!(pipeline.evaluate(&user(owner, true)), Decision::Allow);
    }

    #[test]
    fn denials_map_to_distinct_errors() {
        assert!(matches!(
            Decision::Deny(Denial::NotAuthenticated).ensure("post"),
            Err(DomainError::Unauthenticated)
        ));
        assert!(matches!(
            Decision::Deny(Denial::NotOwner).ensure("delete this post"),
            Err(DomainError::PermissionDenied(msg)) if msg == "only the author may delete this post"
        ));
        assert!(Decision::Allow.ensure("anything").is_ok());
    }
}
