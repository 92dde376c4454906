pub use errors::TitleError;
pub use ladder::{NextTier, TitleLadder, TitleProgress, TitleThreshold};

mod errors;
mod ladder;
