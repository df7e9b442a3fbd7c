use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{DateTime, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    connection::{MongoConfig, establish_connection},
    error::{MongoDaoError, MongoResult},
    models::{MongoPlayDocument, MongoPlayerDocument, MongoRoomDocument, doc_id, uuid_as_binary},
};
use crate::dao::{
    models::{PlayFingerprint, PlayerEntity, QuizPlayEntity, RoomEntity, RoomStatus},
    room_store::RoomStore,
    storage::StorageResult,
};

const ROOM_COLLECTION_NAME: &str = "rooms";
const PLAYER_COLLECTION_NAME: &str = "players";
const PLAY_COLLECTION_NAME: &str = "quiz_plays";

#[derive(Clone)]
pub struct MongoRoomStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoRoomStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        // Room codes are resolved on every join.
        let room_collection = database.collection::<MongoRoomDocument>(ROOM_COLLECTION_NAME);
        let code_index = mongodb::IndexModel::builder()
            .keys(doc! {"room_code": 1, "status": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("room_code_status_idx".to_owned()))
                    .build(),
            )
            .build();
        room_collection
            .create_index(code_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ROOM_COLLECTION_NAME,
                index: "room_code,status",
                source,
            })?;

        // One player row per (room, user); the unique index is what makes
        // concurrent joins safe.
        let player_collection = database.collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME);
        let membership_index = mongodb::IndexModel::builder()
            .keys(doc! {"room_id": 1, "user_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_membership_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        player_collection
            .create_index(membership_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "room_id,user_id",
                source,
            })?;

        let seating_index = mongodb::IndexModel::builder()
            .keys(doc! {"room_id": 1, "joined_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_seating_idx".to_owned()))
                    .build(),
            )
            .build();
        player_collection
            .create_index(seating_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "room_id,joined_at",
                source,
            })?;

        let play_collection = database.collection::<MongoPlayDocument>(PLAY_COLLECTION_NAME);
        let play_index = mongodb::IndexModel::builder()
            .keys(doc! {"user_id": 1, "played_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("play_history_idx".to_owned()))
                    .build(),
            )
            .build();
        play_collection
            .create_index(play_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAY_COLLECTION_NAME,
                index: "user_id,played_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn room_collection(&self) -> Collection<MongoRoomDocument> {
        self.database()
            .await
            .collection::<MongoRoomDocument>(ROOM_COLLECTION_NAME)
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database()
            .await
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME)
    }

    async fn play_collection(&self) -> Collection<MongoPlayDocument> {
        self.database()
            .await
            .collection::<MongoPlayDocument>(PLAY_COLLECTION_NAME)
    }

    async fn save_room(&self, room: RoomEntity) -> MongoResult<()> {
        let id = room.id;
        let document: MongoRoomDocument = room.into();
        self.room_collection()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRoom { id, source })?;
        Ok(())
    }

    async fn find_room(&self, id: Uuid) -> MongoResult<Option<RoomEntity>> {
        let document = self
            .room_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRoom { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn find_waiting_room_by_code(&self, code: String) -> MongoResult<Option<RoomEntity>> {
        let document = self
            .room_collection()
            .await
            .find_one(doc! {
                "room_code": &code,
                "status": RoomStatus::Waiting.to_string(),
            })
            .await
            .map_err(|source| MongoDaoError::ResolveRoomCode { code, source })?;
        Ok(document.map(Into::into))
    }

    async fn upsert_player(&self, player: PlayerEntity) -> MongoResult<()> {
        let room_id = player.room_id;
        let user_id = player.user_id;
        let document: MongoPlayerDocument = player.into();
        self.player_collection()
            .await
            .replace_one(
                doc! {
                    "room_id": uuid_as_binary(room_id),
                    "user_id": uuid_as_binary(user_id),
                },
                &document,
            )
            .upsert(true)
            .await
            .map_err(|source| {
                if is_duplicate_key(&source) {
                    MongoDaoError::DuplicatePlayer { room_id, user_id }
                } else {
                    MongoDaoError::SavePlayer { room_id, source }
                }
            })?;
        Ok(())
    }

    async fn find_player(&self, room_id: Uuid, user_id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        let document = self
            .player_collection()
            .await
            .find_one(doc! {
                "room_id": uuid_as_binary(room_id),
                "user_id": uuid_as_binary(user_id),
            })
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { room_id, source })?;
        Ok(document.map(Into::into))
    }

    async fn find_player_by_id(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> MongoResult<Option<PlayerEntity>> {
        let document = self
            .player_collection()
            .await
            .find_one(doc! {
                "_id": uuid_as_binary(player_id),
                "room_id": uuid_as_binary(room_id),
            })
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { room_id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_players(&self, room_id: Uuid) -> MongoResult<Vec<PlayerEntity>> {
        let documents: Vec<MongoPlayerDocument> = self
            .player_collection()
            .await
            .find(doc! {"room_id": uuid_as_binary(room_id)})
            .sort(doc! {"joined_at": 1})
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { room_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadPlayers { room_id, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_player(&self, room_id: Uuid, player_id: Uuid) -> MongoResult<bool> {
        let result = self
            .player_collection()
            .await
            .delete_one(doc! {
                "_id": uuid_as_binary(player_id),
                "room_id": uuid_as_binary(room_id),
            })
            .await
            .map_err(|source| MongoDaoError::DeletePlayer {
                room_id,
                player_id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_play(&self, play: QuizPlayEntity) -> MongoResult<()> {
        let id = play.id;
        let document: MongoPlayDocument = play.into();
        self.play_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SavePlay { id, source })?;
        Ok(())
    }

    async fn find_recent_play(
        &self,
        fingerprint: PlayFingerprint,
        since: SystemTime,
    ) -> MongoResult<Option<QuizPlayEntity>> {
        let document = self
            .play_collection()
            .await
            .find_one(doc! {
                "quiz_id": uuid_as_binary(fingerprint.quiz_id),
                "user_id": uuid_as_binary(fingerprint.user_id),
                "score": fingerprint.score,
                "total_questions": fingerprint.total_questions as i64,
                "correct_answers": fingerprint.correct_answers as i64,
                "played_at": doc! {"$gte": DateTime::from_system_time(since)},
            })
            .await
            .map_err(|source| MongoDaoError::LoadPlays { source })?;
        Ok(document.map(Into::into))
    }

    async fn list_plays(&self, user_id: Uuid) -> MongoResult<Vec<QuizPlayEntity>> {
        let documents: Vec<MongoPlayDocument> = self
            .play_collection()
            .await
            .find(doc! {"user_id": uuid_as_binary(user_id)})
            .sort(doc! {"played_at": -1})
            .await
            .map_err(|source| MongoDaoError::LoadPlays { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadPlays { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

impl RoomStore for MongoRoomStore {
    fn insert_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_room(room).await.map_err(Into::into) })
    }

    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_room(id).await.map_err(Into::into) })
    }

    fn find_waiting_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_waiting_room_by_code(code)
                .await
                .map_err(Into::into)
        })
    }

    fn update_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_room(room).await.map_err(Into::into) })
    }

    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_player(player).await.map_err(Into::into) })
    }

    fn find_player(
        &self,
        room_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(room_id, user_id).await.map_err(Into::into) })
    }

    fn find_player_by_id(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_player_by_id(room_id, player_id)
                .await
                .map_err(Into::into)
        })
    }

    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players(room_id).await.map_err(Into::into) })
    }

    fn delete_player(
        &self,
        room_id: Uuid,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_player(room_id, player_id)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_play(&self, play: QuizPlayEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_play(play).await.map_err(Into::into) })
    }

    fn find_recent_play(
        &self,
        fingerprint: PlayFingerprint,
        since: SystemTime,
    ) -> BoxFuture<'static, StorageResult<Option<QuizPlayEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_recent_play(fingerprint, since)
                .await
                .map_err(Into::into)
        })
    }

    fn list_plays(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<QuizPlayEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_plays(user_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
