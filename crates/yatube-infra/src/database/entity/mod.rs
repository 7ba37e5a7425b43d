//! SeaORM entities mirroring the tables created by the migration.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

use sea_orm::ActiveValue::{self, NotSet, Set};
use yatube_core::domain::{Id, UNSAVED};

/// Unsaved records leave the key to the sequence.
pub(crate) fn primary_key(id: Id) -> ActiveValue<Id> {
    if id == UNSAVED { NotSet } else { Set(id) }
}
