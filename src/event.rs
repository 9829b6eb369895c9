/// How a completed round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Discrete change notifications emitted by round mutations. The UI layer
/// renders from these instead of watching the card list for mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    CardFlipped { id: u32 },
    PairMatched { first: u32, second: u32 },
    PairMismatched { first: u32, second: u32 },
    PairHidden { first: u32, second: u32 },
    TimerTick { remaining: u32 },
    RoundCompleted { outcome: Outcome },
}
