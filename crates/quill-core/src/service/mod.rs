//! Workflows - guards composed with store calls.
//!
//! Every mutating operation evaluates its guard before the first store
//! write, so a denied request leaves the store untouched.

mod accounts;
mod comments;
mod posts;

pub use accounts::{AccountService, LoginOutcome, Registration};
pub use comments::CommentService;
pub use posts::{NO_TAG_SLUG, Page, PostDetail, PostService, PostView, TagListing};
