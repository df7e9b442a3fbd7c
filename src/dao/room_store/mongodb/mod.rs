mod connection;
mod error;
mod models;
pub mod store;

pub use connection::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoRoomStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicatePlayer { room_id, user_id } => StorageError::conflict(format!(
                "player row already exists for room `{room_id}` and user `{user_id}`"
            )),
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
