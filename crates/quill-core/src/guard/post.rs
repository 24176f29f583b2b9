//! Post authorization guard.

use super::{Check, Decision, Pipeline};
use crate::domain::Post;
use crate::principal::Principal;

/// Logged-in, active users may write posts.
pub fn can_create(principal: &Principal) -> Decision {
    Pipeline::new()
        .then(Check::Authenticated)
        .then(Check::Active)
        .evaluate(principal)
}

/// Only the author may edit a post.
pub fn can_mutate(principal: &Principal, post: &Post) -> Decision {
    Pipeline::new()
        .then(Check::Authenticated)
        .then(Check::Owner(post.author_id()))
        .evaluate(principal)
}

pub fn can_delete(principal: &Principal, post: &Post) -> Decision {
    can_mutate(principal, post)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::PostDraft;
    use crate::guard::Denial;

    fn user(id: Uuid, is_active: bool) -> Principal {
        Principal::User {
            id,
            is_active,
            session_id: None,
        }
    }

    #[test]
    fn create_requires_active_login() {
        assert!(!can_create(&Principal::Anonymous).is_allowed());
        assert_eq!(
            can_create(&user(Uuid::new_v4(), false)),
            Decision::Deny(Denial::Inactive)
        );
        assert!(can_create(&user(Uuid::new_v4(), true)).is_allowed());
    }

    #[test]
    fn only_author_may_mutate_or_delete() {
        let author = Uuid::new_v4();
        let post = Post::new(author, &PostDraft::default());

        for principal in [
            Principal::Anonymous,
            user(Uuid::new_v4(), true),
            user(Uuid::new_v4(), false),
        ] {
            assert!(!can_mutate(&principal, &post).is_allowed());
            assert!(!can_delete(&principal, &post).is_allowed());
        }

        assert!(can_mutate(&user(author, true), &post).is_allowed());
        assert!(can_delete(&user(author, true), &post).is_allowed());
    }
}
