pub mod api;
pub mod constants;
pub mod prize;
pub mod reel;

pub use prize::{Prize, PrizeCatalog, WonGift};
pub use reel::error::ReelError;
