use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::config::RoundConfig;
use crate::error::{Error, Result};
use crate::round::{PAIR_SIZE, Round};

/// Durable capture of a round, sufficient to resume it later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRound {
    pub username: String,
    pub configuration: RoundConfig,
    pub cards: Vec<Card>,
    pub saved_at: DateTime<Utc>,
    pub is_completed: bool,
}

impl SavedRound {
    pub fn capture(round: &Round, saved_at: DateTime<Utc>) -> Self {
        let mut configuration = round.config().clone();
        configuration.elapsed_time = configuration.total_time - round.remaining_time();
        SavedRound {
            username: round.username().to_string(),
            configuration,
            cards: round.cards().to_vec(),
            saved_at,
            is_completed: round.is_completed(),
        }
    }

    /// Validates the record and rebuilds the round. Deserialization alone is
    /// not trusted: dimensions, card count, pairing, and flag consistency are
    /// all checked before any state is built.
    pub fn into_round(self) -> Result<Round> {
        self.configuration.validate()?;
        if self.cards.len() != self.configuration.card_count() {
            return Err(Error::CorruptRecord {
                reason: format!(
                    "expected {} cards, found {}",
                    self.configuration.card_count(),
                    self.cards.len()
                ),
            });
        }

        let mut ids = HashSet::new();
        let mut pair_sizes: HashMap<u32, usize> = HashMap::new();
        for card in &self.cards {
            if !ids.insert(card.id) {
                return Err(Error::CorruptRecord {
                    reason: format!("duplicate card id {}", card.id),
                });
            }
            *pair_sizes.entry(card.pair_id).or_default() += 1;
            if card.is_matched && !card.is_flipped {
                return Err(Error::CorruptRecord {
                    reason: format!("card {} is matched but face-down", card.id),
                });
            }
        }
        for (pair_id, count) in &pair_sizes {
            if *count != PAIR_SIZE {
                return Err(Error::CorruptRecord {
                    reason: format!("pair {pair_id} has {count} cards"),
                });
            }
        }

        Ok(Round::resume(self.username, self.configuration, self.cards))
    }
}
