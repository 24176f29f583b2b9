//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;
mod session;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};
pub use session::{Session, SessionError, SessionStore};
