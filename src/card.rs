use serde::{Deserialize, Serialize};

/// One card on the board. Exactly two cards in a round share a `pair_id`.
/// A matched card stays flipped for the rest of the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u32,
    pub image_path: String,
    pub pair_id: u32,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub fn new(id: u32, image_path: impl Into<String>, pair_id: u32) -> Self {
        Card {
            id,
            image_path: image_path.into(),
            pair_id,
            is_flipped: false,
            is_matched: false,
        }
    }
}
