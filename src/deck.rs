use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::assets::{ImageCatalog, PLACEHOLDER_IMAGE};
use crate::card::Card;
use crate::config::RoundConfig;

/// Builds the shuffled deck for a round: one image per pair, two cards per
/// image, ids sequential across the whole deck. When the catalog offers fewer
/// distinct images than pairs they repeat cyclically, so two pairs may look
/// identical while carrying different pair ids.
pub fn generate_deck<R: Rng + ?Sized>(
    config: &RoundConfig,
    catalog: &dyn ImageCatalog,
    rng: &mut R,
) -> Vec<Card> {
    let pair_count = config.pair_count();
    let images = distinct_images(catalog, config, pair_count);

    let mut cards = Vec::with_capacity(pair_count * 2);
    for pair_id in 0..pair_count as u32 {
        let image = &images[pair_id as usize % images.len()];
        cards.push(Card::new(pair_id * 2, image.clone(), pair_id));
        cards.push(Card::new(pair_id * 2 + 1, image.clone(), pair_id));
    }

    cards.shuffle(rng);
    cards
}

fn distinct_images(
    catalog: &dyn ImageCatalog,
    config: &RoundConfig,
    pair_count: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut images: Vec<String> = catalog
        .list_images(config.category)
        .into_iter()
        .filter(|image| seen.insert(image.clone()))
        .collect();

    if images.is_empty() {
        warn!(category = config.category.name(), "no images found, using placeholders");
        images.push(PLACEHOLDER_IMAGE.to_string());
    } else if images.len() < pair_count {
        warn!(
            available = images.len(),
            needed = pair_count,
            "not enough distinct images, reusing cyclically"
        );
    }
    images
}
