use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save room `{id}`")]
    SaveRoom {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load room `{id}`")]
    LoadRoom {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to resolve room code `{code}`")]
    ResolveRoomCode {
        code: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save player for room `{room_id}`")]
    SavePlayer {
        room_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("player row already exists for room `{room_id}` and user `{user_id}`")]
    DuplicatePlayer { room_id: Uuid, user_id: Uuid },
    #[error("failed to load players of room `{room_id}`")]
    LoadPlayers {
        room_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete player `{player_id}` of room `{room_id}`")]
    DeletePlayer {
        room_id: Uuid,
        player_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to save quiz play `{id}`")]
    SavePlay {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load quiz plays")]
    LoadPlays {
        #[source]
        source: MongoError,
    },
}
