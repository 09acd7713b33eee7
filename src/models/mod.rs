//! Core data models.

mod ids;
mod match_detail;
mod match_record;
mod player;
mod scoreboard;
mod stats;

pub use ids::*;
pub use match_detail::*;
pub use match_record::*;
pub use player::*;
pub use scoreboard::*;
pub use stats::*;
