pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::time::SystemTime;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{PlayFingerprint, PlayerEntity, QuizPlayEntity, RoomEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for rooms, players, and plays.
///
/// Implementations must uphold two constraints the services rely on:
/// at most one player row per `(room_id, user_id)` pair, and
/// [`RoomStore::list_players`] ordered by `joined_at` ascending.
pub trait RoomStore: Send + Sync {
    /// Insert a freshly created room.
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a room by primary key.
    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Resolve a join code against rooms still in the waiting state.
    fn find_waiting_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Replace a room row with the provided state.
    fn update_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;

    /// Insert or replace the player row for `(room_id, user_id)`.
    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a player row by room and account.
    fn find_player(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Fetch a player row by room and row id.
    fn find_player_by_id(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// All players of a room, ordered by join time ascending.
    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Delete a player row, returning whether anything was removed.
    fn delete_player(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Insert a recorded quiz play.
    fn insert_play(&self, play: QuizPlayEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Find a play matching `fingerprint` recorded at or after `since`.
    fn find_recent_play(
        &self,
        fingerprint: PlayFingerprint,
        since: SystemTime,
    ) -> BoxFuture<'static, StorageResult<Option<QuizPlayEntity>>>;
    /// All plays of one account, ordered by play time descending.
    fn list_plays(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<QuizPlayEntity>>>;

    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
