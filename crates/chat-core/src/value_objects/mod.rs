//! Value objects - immutable types that represent domain concepts

mod room_id;
mod user_id;

pub use room_id::{RoomId, RoomIdError};
pub use user_id::UserId;
