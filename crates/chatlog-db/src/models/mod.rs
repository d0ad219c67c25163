//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod community;
mod message;
mod name_change;
mod thread;
mod user;

pub use channel::ChannelModel;
pub use community::CommunityModel;
pub use message::{MessageEditModel, MessageModel};
pub use name_change::NameChangeModel;
pub use thread::ThreadModel;
pub use user::UserModel;
