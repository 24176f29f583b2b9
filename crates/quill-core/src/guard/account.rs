//! Account deletion guard.

use super::{Check, Decision, Pipeline};
use crate::principal::Principal;

/// A logged-in user may always delete their own account.
pub fn can_delete_self(principal: &Principal) -> Decision {
    Pipeline::new()
        .then(Check::Authenticated)
        .evaluate(principal)
}
