pub mod game;
pub mod user;

pub use game::{Card, CardId, Difficulty, GameResult, GameType};
pub use user::{LeaderboardEntry, User, UserStats};
