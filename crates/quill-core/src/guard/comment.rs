//! Comment authorization guard.
//!
//! Update and delete share one ownership predicate.

use super::{Check, Decision, Pipeline};
use crate::domain::Comment;
use crate::principal::Principal;

/// Any logged-in user may comment on any post.
pub fn can_create(principal: &Principal) -> Decision {
    Pipeline::new()
        .then(Check::Authenticated)
        .evaluate(principal)
}

pub fn can_mutate(principal: &Principal, comment: &Comment) -> Decision {
    Pipeline::new()
        .then(Check::Authenticated)
        .then(Check::Owner(comment.author_id()))
        .evaluate(principal)
}

pub fn can_delete(principal: &Principal, comment: &Comment) -> Decision {
    can_mutate(principal, comment)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn any_login_may_comment() {
        assert!(!can_create(&Principal::Anonymous).is_allowed());
        let inactive = Principal::User {
            id: Uuid::new_v4(),
            is_active: false,
            session_id: None,
        };
        assert!(can_create(&inactive).is_allowed());
    }

    #[test]
    fn only_author_may_mutate_or_delete() {
        let author = Uuid::new_v4();
        let comment = Comment::new(Uuid::new_v4(), author, "hi".to_string());
        let stranger = Principal::User {
            id: Uuid::new_v4(),
            is_active: true,
            session_id: None,
        };
        let owner = Principal::User {
            id: author,
            is_active: true,
            session_id: None,
        };

        assert!(!can_mutate(&Principal::Anonymous, &comment).is_allowed());
        assert!(!can_mutate(&stranger, &comment).is_allowed());
        assert!(!can_delete(&stranger, &comment).is_allowed());
        assert!(can_mutate(&owner, &comment).is_allowed());
        assert!(can_delete(&owner, &comment).is_allowed());
    }
}
