use uuid::Uuid;

use crate::{
    dao::models::PlayerEntity,
    dto::{
        format_system_time,
        leaderboard::{LeaderboardEntry, LeaderboardResponse},
    },
    error::ServiceError,
    state::SharedState,
};

/// Build the live leaderboard for a room.
pub async fn leaderboard(
    state: &SharedState,
    room_id: Uuid,
    total_questions: u32,
) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_room_store().await?;
    if store.find_room(room_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("room `{room_id}` not found")));
    }

    let players = store.list_players(room_id).await?;
    Ok(LeaderboardResponse {
        entries: rank_players(&players, total_questions),
        total_questions,
    })
}

/// Rank players by score descending; ties keep seating order.
///
/// The sort is stable on purpose: two players on the same score stay in
/// join order, so the board does not shuffle under them between refreshes.
pub fn rank_players(players: &[PlayerEntity], total_questions: u32) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&PlayerEntity> = players.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, player)| LeaderboardEntry {
            rank: index as u32 + 1,
            player_id: player.id,
            user_id: player.user_id,
            nickname: player.nickname.clone(),
            score: player.score,
            percentage: percentage(player.score, total_questions),
            quiz_completed: player.quiz_completed,
            completed_at: player.completed_at.map(format_system_time),
        })
        .collect()
}

/// Score as a percentage of the maximum attainable (100 points per question).
pub fn percentage(score: i32, total_questions: u32) -> u32 {
    if total_questions == 0 {
        return 0;
    }
    let max_score = f64::from(total_questions) * 100.0;
    (f64::from(score) / max_score * 100.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn player(nickname: &str, score: i32) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            nickname: nickname.to_string(),
            score,
            joined_at: SystemTime::now(),
            is_ready: true,
            quiz_completed: false,
            completed_at: None,
        }
    }

    #[test]
    fn sorts_descending_by_score() {
        let players = vec![player("low", 100), player("high", 300), player("mid", 200)];
        let entries = rank_players(&players, 3);
        let names: Vec<_> = entries.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn ties_keep_original_order() {
        let players = vec![
            player("first", 200),
            player("second", 200),
            player("third", 200),
        ];
        let entries = rank_players(&players, 3);
        let names: Vec<_> = entries.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        // 250 of a possible 300 is 83.33 percent.
        assert_eq!(percentage(250, 3), 83);
        assert_eq!(percentage(300, 3), 100);
        assert_eq!(percentage(0, 3), 0);
        // 250 of 400 is 62.5, rounding up.
        assert_eq!(percentage(250, 4), 63);
    }

    #[test]
    fn percentage_without_question_count_is_zero() {
        assert_eq!(percentage(250, 0), 0);
    }

    #[test]
    fn negative_scores_clamp_to_zero_percent() {
        assert_eq!(percentage(-50, 3), 0);
    }
}
