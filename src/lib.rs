//! Engine for a memory-matching card game: deck generation, the flip/match
//! state machine, the one-second countdown, player profiles, and saved-round
//! persistence. A GUI shell drives a [`GameSession`] and renders from the
//! [`RoundEvent`]s it emits; windows, dialogs, and image decoding stay on the
//! shell's side of the boundary.

pub mod assets;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod event;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod store;

pub use assets::{DirCatalog, ImageCatalog, PLACEHOLDER_IMAGE};
pub use card::Card;
pub use config::{Category, Mode, RoundConfig};
pub use deck::generate_deck;
pub use error::{Error, Result};
pub use event::{Outcome, RoundEvent};
pub use round::{Phase, Round};
pub use session::GameSession;
pub use snapshot::SavedRound;
pub use store::games::GameStore;
pub use store::users::{User, UserStore};
