//! Cache records.
//!
//! These are the values held by the entity stores. They are plain data,
//! owned by the cache and rebuilt from payloads on every write.

pub mod channel;
pub mod emoji;
pub mod guild;
pub mod ids;
pub mod member;
pub mod request;
pub mod role;
pub mod user;
pub mod voice_state;

pub use channel::{ChannelKind, ChannelRecord};
pub use emoji::EmojiRecord;
pub use guild::GuildRecord;
pub use member::MemberRecord;
pub use request::PendingMemberRequest;
pub use role::RoleRecord;
pub use user::UserRecord;
pub use voice_state::VoiceStateRecord;
