use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{PlayerEntity, QuizPlayEntity, RoomEntity, RoomStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoomDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    quiz_id: Uuid,
    host_id: Uuid,
    created_by: Uuid,
    room_code: String,
    status: RoomStatus,
    created_at: DateTime,
    started_at: Option<DateTime>,
    finished_at: Option<DateTime>,
    game_started_at: Option<DateTime>,
    game_redirect_url: Option<String>,
    host_nickname: Option<String>,
}

impl From<RoomEntity> for MongoRoomDocument {
    fn from(value: RoomEntity) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            host_id: value.host_id,
            created_by: value.created_by,
            room_code: value.room_code,
            status: value.status,
            created_at: DateTime::from_system_time(value.created_at),
            started_at: value.started_at.map(DateTime::from_system_time),
            finished_at: value.finished_at.map(DateTime::from_system_time),
            game_started_at: value.game_started_at.map(DateTime::from_system_time),
            game_redirect_url: value.game_redirect_url,
            host_nickname: value.host_nickname,
        }
    }
}

impl From<MongoRoomDocument> for RoomEntity {
    fn from(value: MongoRoomDocument) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            host_id: value.host_id,
            created_by: value.created_by,
            room_code: value.room_code,
            status: value.status,
            created_at: value.created_at.to_system_time(),
            started_at: value.started_at.map(|ts| ts.to_system_time()),
            finished_at: value.finished_at.map(|ts| ts.to_system_time()),
            game_started_at: value.game_started_at.map(|ts| ts.to_system_time()),
            game_redirect_url: value.game_redirect_url,
            host_nickname: value.host_nickname,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    room_id: Uuid,
    user_id: Uuid,
    nickname: String,
    score: i32,
    joined_at: DateTime,
    is_ready: bool,
    quiz_completed: bool,
    completed_at: Option<DateTime>,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            user_id: value.user_id,
            nickname: value.nickname,
            score: value.score,
            joined_at: DateTime::from_system_time(value.joined_at),
            is_ready: value.is_ready,
            quiz_completed: value.quiz_completed,
            completed_at: value.completed_at.map(DateTime::from_system_time),
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            user_id: value.user_id,
            nickname: value.nickname,
            score: value.score,
            joined_at: value.joined_at.to_system_time(),
            is_ready: value.is_ready,
            quiz_completed: value.quiz_completed,
            completed_at: value.completed_at.map(|ts| ts.to_system_time()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    quiz_id: Uuid,
    user_id: Uuid,
    score: i32,
    total_questions: u32,
    correct_answers: u32,
    played_at: DateTime,
}

impl From<QuizPlayEntity> for MongoPlayDocument {
    fn from(value: QuizPlayEntity) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            user_id: value.user_id,
            score: value.score,
            total_questions: value.total_questions,
            correct_answers: value.correct_answers,
            played_at: DateTime::from_system_time(value.played_at),
        }
    }
}

impl From<MongoPlayDocument> for QuizPlayEntity {
    fn from(value: MongoPlayDocument) -> Self {
        Self {
            id: value.id,
            quiz_id: value.quiz_id,
            user_id: value.user_id,
            score: value.score,
            total_questions: value.total_questions,
            correct_answers: value.correct_answers,
            played_at: value.played_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}
