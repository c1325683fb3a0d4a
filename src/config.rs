use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of cells along each side of the board.
    pub dimension: usize,
    /// Value of the winning tile.
    pub threshold: u32,
    /// Remaining moves at the start of a game.
    pub initial_remaining_moves: u32,
    /// Maximum number of moves waiting in the queue.
    pub queue_capacity: usize,
    /// Minimum delay between two moves that change the board.
    pub queue_delay: Duration,
}

impl GameConfig {
    pub const MIN_DIMENSION: usize = 2;
    pub const MIN_THRESHOLD: u32 = 8;

    /// Raises `dimension` and `threshold` to their minimums.
    pub fn clamped(self) -> Self {
        Self {
            dimension: self.dimension.max(Self::MIN_DIMENSION),
            threshold: self.threshold.max(Self::MIN_THRESHOLD),
            ..self
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimension: 4,
            threshold: 987,
            initial_remaining_moves: 130,
            queue_capacity: 100,
            queue_delay: Duration::from_millis(300),
        }
    }
}
