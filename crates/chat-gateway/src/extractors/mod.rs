//! Request extractors that reject with [`ApiError`](crate::response::ApiError)

mod body;
mod path;

pub use body::{JsonBody, QueryParams};
pub use path::{MessagePath, RoomPath};
