use chrono::{DateTime, Utc};
use tracing::debug;

use crate::card::Card;
use crate::config::RoundConfig;
use crate::event::{Outcome, RoundEvent};

pub const PAIR_SIZE: usize = 2;

/// Flip sequencer phase. Resolution of a second card happens synchronously
/// inside `flip`, so there is no observable in-between state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Zero or one cards selected, accepting input.
    Idle,
    /// Two mismatched cards face-up, waiting for the delayed unflip.
    Cooldown { token: u64 },
    Over { outcome: Outcome },
}

/// One playthrough: the authoritative card list plus the flip sequencer and
/// countdown bookkeeping. All card mutation goes through `flip`, `tick`, and
/// `release_cooldown`; everything else is read-only.
#[derive(Clone, Debug)]
pub struct Round {
    username: String,
    config: RoundConfig,
    cards: Vec<Card>,
    selected: Vec<u32>,
    phase: Phase,
    cooldown_seq: u64,
    saved_at: Option<DateTime<Utc>>,
}

impl Round {
    pub fn new(username: impl Into<String>, config: RoundConfig, cards: Vec<Card>) -> Self {
        Round {
            username: username.into(),
            config,
            cards,
            selected: Vec::new(),
            phase: Phase::Idle,
            cooldown_seq: 0,
            saved_at: None,
        }
    }

    /// Rebuilds a round from persisted cards. The sequencer always comes back
    /// `Idle` with an empty selection; a pair that was mid-cooldown at save
    /// time resumes as simply flipped-and-unmatched.
    pub(crate) fn resume(username: String, config: RoundConfig, cards: Vec<Card>) -> Self {
        let mut round = Round::new(username, config, cards);
        if round.is_won() {
            round.phase = Phase::Over {
                outcome: Outcome::Won,
            };
        } else if round.remaining_time() == 0 {
            round.phase = Phase::Over {
                outcome: Outcome::Lost,
            };
        }
        round
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: u32) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    fn card_mut(&mut self, id: u32) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_time(&self) -> u32 {
        self.config.total_time.saturating_sub(self.config.elapsed_time)
    }

    pub fn is_won(&self) -> bool {
        self.cards.iter().all(|card| card.is_matched)
    }

    pub fn is_lost(&self) -> bool {
        self.remaining_time() == 0 && !self.is_won()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, Phase::Over { .. })
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Over { outcome } => Some(outcome),
            _ => None,
        }
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    pub(crate) fn mark_saved(&mut self, at: DateTime<Utc>) {
        self.saved_at = Some(at);
    }

    /// Face-up selection attempt. Returns the events it produced; an empty
    /// list means the input was rejected: the round is over or cooling down,
    /// the id is unknown, or the card is already face-up or matched (which
    /// covers re-selecting the current pick).
    pub fn flip(&mut self, id: u32) -> Vec<RoundEvent> {
        if self.phase != Phase::Idle {
            return Vec::new();
        }
        match self.card(id) {
            Some(card) if !card.is_flipped && !card.is_matched => {}
            _ => return Vec::new(),
        }

        if let Some(card) = self.card_mut(id) {
            card.is_flipped = true;
        }
        self.selected.push(id);
        debug!(card = id, picked = self.selected.len(), "card flipped");

        let mut events = vec![RoundEvent::CardFlipped { id }];
        if self.selected.len() == PAIR_SIZE {
            self.resolve_pair(&mut events);
        }
        events
    }

    fn resolve_pair(&mut self, events: &mut Vec<RoundEvent>) {
        let first = self.selected[0];
        let second = self.selected[1];
        let first_pair = self.card(first).map(|card| card.pair_id);
        let second_pair = self.card(second).map(|card| card.pair_id);

        if first_pair.is_some() && first_pair == second_pair {
            for id in [first, second] {
                if let Some(card) = self.card_mut(id) {
                    card.is_matched = true;
                }
            }
            self.selected.clear();
            events.push(RoundEvent::PairMatched { first, second });
            if self.is_won() {
                self.phase = Phase::Over {
                    outcome: Outcome::Won,
                };
                events.push(RoundEvent::RoundCompleted {
                    outcome: Outcome::Won,
                });
            }
        } else {
            self.cooldown_seq += 1;
            self.phase = Phase::Cooldown {
                token: self.cooldown_seq,
            };
            events.push(RoundEvent::PairMismatched { first, second });
        }
    }

    /// Token of the pending mismatch cooldown, if one is waiting.
    pub fn cooldown_token(&self) -> Option<u64> {
        match self.phase {
            Phase::Cooldown { token } => Some(token),
            _ => None,
        }
    }

    /// Turns the mismatched pair face-down again. A stale token (cooldown
    /// already released, round replaced or over) is a no-op with no partial
    /// mutation.
    pub fn release_cooldown(&mut self, token: u64) -> Vec<RoundEvent> {
        if self.phase != (Phase::Cooldown { token }) {
            return Vec::new();
        }
        let first = self.selected[0];
        let second = self.selected[1];
        for id in [first, second] {
            if let Some(card) = self.card_mut(id) {
                card.is_flipped = false;
            }
        }
        self.selected.clear();
        self.phase = Phase::Idle;
        vec![RoundEvent::PairHidden { first, second }]
    }

    /// One-second countdown step. The 1 -> 0 transition completes the round
    /// as a loss exactly once, overriding a pending cooldown; the two face-up
    /// cards keep their visual state. Ticks after completion do nothing.
    pub fn tick(&mut self) -> Vec<RoundEvent> {
        if self.is_completed() || self.remaining_time() == 0 {
            return Vec::new();
        }
        self.config.elapsed_time += 1;
        let remaining = self.remaining_time();
        let mut events = vec![RoundEvent::TimerTick { remaining }];
        if remaining == 0 {
            self.phase = Phase::Over {
                outcome: Outcome::Lost,
            };
            events.push(RoundEvent::RoundCompleted {
                outcome: Outcome::Lost,
            });
        }
        events
    }
}
