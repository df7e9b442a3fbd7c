//! In-process [`RoomStore`] used as the default backend and in tests.

use std::{sync::Arc, time::SystemTime};

use dashmap::DashMap;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    models::{PlayFingerprint, PlayerEntity, QuizPlayEntity, RoomEntity, RoomStatus},
    room_store::RoomStore,
    storage::StorageResult,
};

/// Keeps all rows in process memory.
///
/// Rosters are held in an [`IndexMap`] keyed by `user_id`, so the
/// one-row-per-`(room, user)` constraint holds by construction and
/// insertion order matches join order.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rooms: DashMap<Uuid, RoomEntity>,
    rosters: DashMap<Uuid, IndexMap<Uuid, PlayerEntity>>,
    plays: RwLock<Vec<QuizPlayEntity>>,
}

impl MemoryRoomStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn roster_players(&self, room_id: Uuid) -> Vec<PlayerEntity> {
        let Some(roster) = self.inner.rosters.get(&room_id) else {
            return Vec::new();
        };
        let mut players: Vec<PlayerEntity> = roster.values().cloned().collect();
        players.sort_by_key(|player| player.joined_at);
        players
    }
}

impl RoomStore for MemoryRoomStore {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.rosters.entry(room.id).or_default();
            store.inner.rooms.insert(room.id, room);
            Ok(())
        })
    }

    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.rooms.get(&id).map(|entry| entry.clone())) })
    }

    fn find_waiting_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let found = store
                .inner
                .rooms
                .iter()
                .find(|entry| entry.status == RoomStatus::Waiting && entry.room_code == code)
                .map(|entry| entry.clone());
            Ok(found)
        })
    }

    fn update_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.rooms.insert(room.id, room);
            Ok(())
        })
    }

    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut roster = store.inner.rosters.entry(player.room_id).or_default();
            roster.insert(player.user_id, player);
            Ok(())
        })
    }

    fn find_player(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let found = store
                .inner
                .rosters
                .get(&room_id)
                .and_then(|roster| roster.get(&user_id).cloned());
            Ok(found)
        })
    }

    fn find_player_by_id(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let found = store.inner.rosters.get(&room_id).and_then(|roster| {
                roster
                    .values()
                    .find(|player| player.id == player_id)
                    .cloned()
            });
            Ok(found)
        })
    }

    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.roster_players(room_id)) })
    }

    fn delete_player(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(mut roster) = store.inner.rosters.get_mut(&room_id) else {
                return Ok(false);
            };
            let user_id = roster
                .values()
                .find(|player| player.id == player_id)
                .map(|player| player.user_id);
            let Some(user_id) = user_id else {
                return Ok(false);
            };
            // shift_remove keeps the remaining seating order intact.
            Ok(roster.shift_remove(&user_id).is_some())
        })
    }

    fn insert_play(&self, play: QuizPlayEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.plays.write().await.push(play);
            Ok(())
        })
    }

    fn find_recent_play(
        &self,
        fingerprint: PlayFingerprint,
        since: SystemTime,
    ) -> BoxFuture<'static, StorageResult<Option<QuizPlayEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let plays = store.inner.plays.read().await;
            let found = plays
                .iter()
                .rev()
                .find(|play| play.played_at >= since && fingerprint.matches(play))
                .cloned();
            Ok(found)
        })
    }

    fn list_plays(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<QuizPlayEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let plays = store.inner.plays.read().await;
            // Reverse insertion order first so equal timestamps resolve
            // newest-first under the stable sort.
            let mut mine: Vec<QuizPlayEntity> = plays
                .iter()
                .rev()
                .filter(|play| play.user_id == user_id)
                .cloned()
                .collect();
            mine.sort_by(|a, b| b.played_at.cmp(&a.played_at));
            Ok(mine)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(room_id: Uuid, user_id: Uuid, nickname: &str, joined_at: SystemTime) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            nickname: nickname.to_string(),
            score: 0,
            joined_at,
            is_ready: false,
            quiz_completed: false,
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_one_row_per_room_and_user() {
        let store = MemoryRoomStore::new();
        let room_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let joined_at = SystemTime::now();

        let first = player(room_id, user_id, "Ana", joined_at);
        store.upsert_player(first.clone()).await.unwrap();

        let mut renamed = first.clone();
        renamed.nickname = "Ana Maria".to_string();
        store.upsert_player(renamed).await.unwrap();

        let players = store.list_players(room_id).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].nickname, "Ana Maria");
        assert_eq!(players[0].id, first.id);
    }

    #[tokio::test]
    async fn list_players_orders_by_join_time() {
        let store = MemoryRoomStore::new();
        let room_id = Uuid::new_v4();
        let base = SystemTime::UNIX_EPOCH;

        let late = player(
            room_id,
            Uuid::new_v4(),
            "late",
            base + std::time::Duration::from_secs(20),
        );
        let early = player(
            room_id,
            Uuid::new_v4(),
            "early",
            base + std::time::Duration::from_secs(10),
        );
        // Insert out of order on purpose.
        store.upsert_player(late).await.unwrap();
        store.upsert_player(early).await.unwrap();

        let players = store.list_players(room_id).await.unwrap();
        let names: Vec<_> = players.iter().map(|p| p.nickname.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn delete_player_by_row_id() {
        let store = MemoryRoomStore::new();
        let room_id = Uuid::new_v4();
        let kept = player(room_id, Uuid::new_v4(), "kept", SystemTime::now());
        let gone = player(room_id, Uuid::new_v4(), "gone", SystemTime::now());
        store.upsert_player(kept.clone()).await.unwrap();
        store.upsert_player(gone.clone()).await.unwrap();

        assert!(store.delete_player(room_id, gone.id).await.unwrap());
        assert!(!store.delete_player(room_id, gone.id).await.unwrap());

        let players = store.list_players(room_id).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, kept.id);
    }

    #[tokio::test]
    async fn waiting_room_lookup_ignores_started_rooms() {
        let store = MemoryRoomStore::new();
        let mut room = RoomEntity {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            room_code: "AB12CD".to_string(),
            status: RoomStatus::Waiting,
            created_at: SystemTime::now(),
            started_at: None,
            finished_at: None,
            game_started_at: None,
            game_redirect_url: None,
            host_nickname: None,
        };
        store.insert_room(room.clone()).await.unwrap();

        assert!(
            store
                .find_waiting_room_by_code("AB12CD".to_string())
                .await
                .unwrap()
                .is_some()
        );

        room.status = RoomStatus::Playing;
        store.update_room(room).await.unwrap();
        assert!(
            store
                .find_waiting_room_by_code("AB12CD".to_string())
                .await
                .unwrap()
                .is_none()
        );
    }
}
