pub mod prize_reel;
pub mod reel_widgets;

pub use prize_reel::PrizeReel;
