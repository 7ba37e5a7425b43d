//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use post::{Post, PostFilter};
pub use user::User;

/// Identifier type shared by every record.
///
/// `0` marks a record that has not been persisted yet; stores assign the
/// real value on insert.
pub type Id = i64;

/// Identifier of a record that has not been saved yet.
pub const UNSAVED: Id = 0;
