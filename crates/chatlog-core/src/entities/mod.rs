//! Domain entities - the mirrored platform objects and the ledger rows

mod channel;
mod community;
mod kind;
mod message;
mod name_change;
mod observed;
mod thread;
mod user;

pub use channel::Channel;
pub use community::Community;
pub use kind::{Entity, EntityKind};
pub use message::{Message, MessageDeletion, MessageEdit};
pub use name_change::{ChangeKind, NameChange};
pub use observed::ObservedMessage;
pub use thread::Thread;
pub use user::User;
