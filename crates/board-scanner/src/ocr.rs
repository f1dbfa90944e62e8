use common::{Error, GameState, PrizeTier, Result};
use tracing::info;

/// Reads a prize board image into a game state.
pub trait BoardScanner: Send + Sync {
    fn scan(&self, image_name: &str, image: &[u8]) -> Result<GameState>;
}

/// Stand-in recognizer: any non-empty image yields the same sample board.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderScanner;

impl PlaceholderScanner {
    pub fn sample_board() -> GameState {
        GameState {
            game_name: "Golden Treasures".into(),
            ticket_price: 2.0,
            tickets_remaining: 2500,
            prizes: vec![
                PrizeTier { count: 4, value: 500.0 },
                PrizeTier { count: 10, value: 100.0 },
                PrizeTier { count: 50, value: 20.0 },
                PrizeTier { count: 200, value: 5.0 },
            ],
        }
    }
}

impl BoardScanner for PlaceholderScanner {
    fn scan(&self, image_name: &str, image: &[u8]) -> Result<GameState> {
        if image.is_empty() {
            return Err(Error::InvalidInput(format!("image '{}' is empty", image_name)));
        }
        info!(
            "Received image '{}' ({} bytes) for board recognition",
            image_name,
            image.len()
        );
        Ok(Self::sample_board())
    }
}
