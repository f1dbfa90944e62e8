//! Board intake: turning a photo of a retailer's game board into a `GameState`,
//! and estimating sold tickets from a dispenser fill ratio.

pub mod estimate;
pub mod ocr;

pub use estimate::{estimate_tickets, DEFAULT_CORRECTION_FACTOR};
pub use ocr::{BoardScanner, PlaceholderScanner};
