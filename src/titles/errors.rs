use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("Title ladder has no tiers")]
    Empty,

    #[error("Title threshold for '{0}' does not increase")]
    NotIncreasing(String),
}
