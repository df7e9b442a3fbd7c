/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Live leaderboard projection.
pub mod leaderboard_service;
/// Quiz play recording with duplicate suppression.
pub mod play_service;
/// Room-code generation helpers.
pub mod room_codes;
/// Room lifecycle operations (create, join, start, finish).
pub mod room_service;
/// Roster membership and per-player updates.
pub mod roster_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervision and degraded mode.
pub mod storage_supervisor;
