use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the quiz room backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::rooms::create_room,
        crate::routes::rooms::join_room,
        crate::routes::rooms::fetch_room,
        crate::routes::rooms::start_game,
        crate::routes::rooms::finish_game,
        crate::routes::roster::fetch_roster,
        crate::routes::roster::set_ready,
        crate::routes::roster::complete_quiz,
        crate::routes::roster::leave_room,
        crate::routes::leaderboard::leaderboard,
        crate::routes::plays::record_play,
        crate::routes::plays::play_history,
        crate::routes::sse::room_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::RoomSnapshot,
            crate::dto::common::PlayerSummary,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::CreateRoomResponse,
            crate::dto::room::JoinRoomRequest,
            crate::dto::room::JoinRoomResponse,
            crate::dto::roster::ReadyRequest,
            crate::dto::roster::CompleteQuizRequest,
            crate::dto::roster::RosterResponse,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::play::RecordPlayRequest,
            crate::dto::play::RecordPlayResponse,
            crate::dto::play::PlaySummary,
            crate::dto::play::PlayHistoryResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::RosterChangedEvent,
            crate::dto::sse::RoomChangedEvent,
            crate::dao::models::RoomStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rooms", description = "Room lifecycle operations"),
        (name = "roster", description = "Room membership and readiness"),
        (name = "leaderboard", description = "Live score ranking"),
        (name = "plays", description = "Recorded quiz plays"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
