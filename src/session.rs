use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::assets::ImageCatalog;
use crate::card::Card;
use crate::config::RoundConfig;
use crate::deck::generate_deck;
use crate::error::{Error, Result};
use crate::event::{Outcome, RoundEvent};
use crate::round::Round;
use crate::snapshot::SavedRound;
use crate::store::games::GameStore;
use crate::store::users::UserStore;

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const COOLDOWN_DELAY: Duration = Duration::from_millis(1000);

struct Shared {
    username: String,
    round: Option<Round>,
    /// Bumped whenever the round is replaced or closed. Deferred callbacks
    /// capture the value they were scheduled under and no-op on mismatch.
    round_id: u64,
    timer: Option<JoinHandle<()>>,
    cooldown: Option<JoinHandle<()>>,
    users: UserStore,
    games: GameStore,
    events: UnboundedSender<RoundEvent>,
}

/// Serialized driver for one player's rounds: routes flip input, runs the
/// one-second countdown, schedules the mismatch auto-unflip, and records
/// statistics on completion.
///
/// All state lives behind a single `Rc<RefCell<..>>` and every deferred
/// operation resumes on the same thread, so a `GameSession` must run on a
/// current-thread tokio runtime inside a [`tokio::task::LocalSet`].
#[derive(Clone)]
pub struct GameSession {
    shared: Rc<RefCell<Shared>>,
}

impl GameSession {
    pub fn new(
        username: impl Into<String>,
        users: UserStore,
        games: GameStore,
    ) -> (Self, UnboundedReceiver<RoundEvent>) {
        let (events, receiver) = unbounded_channel();
        let session = GameSession {
            shared: Rc::new(RefCell::new(Shared {
                username: username.into(),
                round: None,
                round_id: 0,
                timer: None,
                cooldown: None,
                users,
                games,
                events,
            })),
        };
        (session, receiver)
    }

    pub fn username(&self) -> String {
        self.shared.borrow().username.clone()
    }

    /// True while the countdown is running for the current round.
    pub fn is_active(&self) -> bool {
        self.shared.borrow().timer.is_some()
    }

    pub fn remaining_time(&self) -> Option<u32> {
        self.shared
            .borrow()
            .round
            .as_ref()
            .map(Round::remaining_time)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.shared.borrow().round.as_ref().and_then(Round::outcome)
    }

    /// Snapshot of the card list for rendering.
    pub fn cards(&self) -> Vec<Card> {
        self.shared
            .borrow()
            .round
            .as_ref()
            .map(|round| round.cards().to_vec())
            .unwrap_or_default()
    }

    /// Replaces any current round with a freshly generated one and starts
    /// the countdown. Outstanding deferred work for the old round is
    /// cancelled before the deck is built.
    pub fn start_round(&self, config: RoundConfig, catalog: &dyn ImageCatalog) -> Result<()> {
        config.validate()?;
        {
            let mut shared = self.shared.borrow_mut();
            shared.round_id += 1;
            cancel_tasks(&mut shared);
            let mut rng = rand::rng();
            let cards = generate_deck(&config, catalog, &mut rng);
            debug!(username = %shared.username, cards = cards.len(), "starting new round");
            shared.round = Some(Round::new(shared.username.clone(), config, cards));
        }
        self.start_timer();
        Ok(())
    }

    /// Restores the newest unfinished save for this player and resumes its
    /// countdown from the saved remaining time.
    pub fn resume_latest(&self) -> Result<()> {
        {
            let mut shared = self.shared.borrow_mut();
            let record = shared.games.latest_unfinished(&shared.username)?.ok_or_else(|| {
                Error::NoSavedRound {
                    username: shared.username.clone(),
                }
            })?;
            let round = record.into_round()?;
            shared.round_id += 1;
            cancel_tasks(&mut shared);
            debug!(
                username = %shared.username,
                remaining = round.remaining_time(),
                "resuming saved round"
            );
            shared.round = Some(round);
        }
        self.start_timer();
        Ok(())
    }

    /// Persists the current round. On a write error nothing is marked saved
    /// and the error reaches the caller.
    pub fn save(&self) -> Result<PathBuf> {
        let mut shared = self.shared.borrow_mut();
        let shared = &mut *shared;
        let round = shared.round.as_mut().ok_or(Error::NoActiveRound)?;
        let saved_at = Utc::now();
        let record = SavedRound::capture(round, saved_at);
        let path = shared.games.save(&record)?;
        round.mark_saved(saved_at);
        Ok(path)
    }

    /// Flip input from the UI. Ignored entirely while the round is inactive;
    /// rejection of individual cards is the round's decision.
    pub fn flip(&self, card_id: u32) {
        let (events, mismatch) = {
            let mut shared = self.shared.borrow_mut();
            if shared.timer.is_none() {
                return;
            }
            let Some(round) = shared.round.as_mut() else {
                return;
            };
            let events = round.flip(card_id);
            let mismatch = events
                .iter()
                .any(|event| matches!(event, RoundEvent::PairMismatched { .. }))
                .then(|| round.cooldown_token())
                .flatten();
            (events, mismatch)
        };
        if let Some(token) = mismatch {
            self.schedule_unflip(token);
        }
        self.after_mutation(events);
    }

    /// Walks away from the current round without completing it: cancels the
    /// countdown and any pending unflip. Safe to call twice.
    pub fn close(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.round_id += 1;
        cancel_tasks(&mut shared);
    }

    fn start_timer(&self) {
        let mut shared = self.shared.borrow_mut();
        if shared.timer.is_some() {
            return;
        }
        match &shared.round {
            Some(round) if !round.is_completed() => {}
            _ => return,
        }
        let session = self.clone();
        let round_id = shared.round_id;
        shared.timer = Some(tokio::task::spawn_local(async move {
            loop {
                tokio::time::sleep(TICK_INTERVAL).await;
                let (events, finished) = {
                    let mut shared = session.shared.borrow_mut();
                    if shared.round_id != round_id {
                        return;
                    }
                    let Some(round) = shared.round.as_mut() else {
                        return;
                    };
                    let events = round.tick();
                    (events, round.is_completed())
                };
                session.after_mutation(events);
                if finished {
                    return;
                }
            }
        }));
    }

    fn schedule_unflip(&self, token: u64) {
        let mut shared = self.shared.borrow_mut();
        if let Some(handle) = shared.cooldown.take() {
            handle.abort();
        }
        let session = self.clone();
        let round_id = shared.round_id;
        shared.cooldown = Some(tokio::task::spawn_local(async move {
            tokio::time::sleep(COOLDOWN_DELAY).await;
            let events = {
                let mut shared = session.shared.borrow_mut();
                if shared.round_id != round_id {
                    return;
                }
                shared.cooldown = None;
                match shared.round.as_mut() {
                    Some(round) => round.release_cooldown(token),
                    None => Vec::new(),
                }
            };
            session.after_mutation(events);
        }));
    }

    /// Dispatches events and, on a completion event, stops the countdown,
    /// cancels any pending unflip, and records the result exactly once.
    fn after_mutation(&self, events: Vec<RoundEvent>) {
        let outcome = events.iter().find_map(|event| match event {
            RoundEvent::RoundCompleted { outcome } => Some(*outcome),
            _ => None,
        });
        if let Some(outcome) = outcome {
            let mut shared = self.shared.borrow_mut();
            cancel_tasks(&mut shared);
            debug!(username = %shared.username, ?outcome, "round completed");
            let won = outcome == Outcome::Won;
            if let Err(error) = shared.users.record_result(&shared.username, won) {
                warn!(error = %error, "failed to record round result");
            }
        }

        let shared = self.shared.borrow();
        for event in events {
            let _ = shared.events.send(event);
        }
    }
}

fn cancel_tasks(shared: &mut Shared) {
    if let Some(handle) = shared.timer.take() {
        handle.abort();
    }
    if let Some(handle) = shared.cooldown.take() {
        handle.abort();
    }
}
