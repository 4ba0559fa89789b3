pub mod card;
pub mod deck;
pub mod resolution;

pub use card::{CardCategory, CardRecord};
pub use deck::{Deck, DECK_SIZE};
pub use resolution::{
    AttemptTrace, CardTask, FailureKind, MatchDecision, Resolution, ResolutionFailure,
};
