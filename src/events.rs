/// Notifications the core leaves in `GameSession::events` for the frontend.

use crate::config::GameMode;
use crate::entities::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    GameStarted { game_mode: GameMode },
    EnemyDestroyed { id: EntityId, x: f32, y: f32 },
    ShieldCollected,
    ShieldAbsorbed,
    PlayerHit { lives_left: u32 },
    GameOver { score: u32 },
    /// The best score changed and should be persisted.
    BestScoreChanged(u32),
}
