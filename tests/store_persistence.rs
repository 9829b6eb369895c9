use chrono::{TimeZone, Utc};
use pairmatch::{Card, Category, GameStore, RoundConfig, SavedRound};

fn record_at(username: &str, year: i32, month: u32, day: u32, completed: bool) -> SavedRound {
    let config = RoundConfig::custom(Category::Fruits, 2, 2, 60).unwrap();
    let mut cards = Vec::new();
    for pair_id in 0..config.pair_count() as u32 {
        cards.push(Card::new(pair_id * 2, format!("img_{pair_id}.png"), pair_id));
        cards.push(Card::new(pair_id * 2 + 1, format!("img_{pair_id}.png"), pair_id));
    }
    SavedRound {
        username: username.to_string(),
        configuration: config,
        cards,
        saved_at: Utc.with_ymd_and_hms(year, month, day, 10, 15, 0).unwrap(),
        is_completed: completed,
    }
}

#[test]
fn save_uses_the_naming_convention_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStore::new(dir.path());
    let record = record_at("mara", 2025, 3, 1, false);

    let path = store.save(&record).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "mara_20250301_101500.json"
    );

    let listed = store.list_for_user("mara").unwrap();
    assert_eq!(listed, vec![record]);
}

#[test]
fn usernames_are_sanitized_in_file_names_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStore::new(dir.path());
    let record = record_at("a b/c!", 2025, 3, 1, false);

    let path = store.save(&record).unwrap();
    assert!(
        path.file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("a_b_c__")
    );

    let listed = store.list_for_user("a b/c!").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].username, "a b/c!");
}

#[test]
fn listing_is_newest_first_and_skips_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStore::new(dir.path());
    store.save(&record_at("mara", 2025, 3, 1, false)).unwrap();
    store.save(&record_at("mara", 2025, 3, 2, false)).unwrap();
    store.save(&record_at("finn", 2025, 3, 3, false)).unwrap();

    let saved_games = dir.path().join("saved_games");
    std::fs::write(saved_games.join("mara_19700101_000000.json"), "not json").unwrap();

    let listed = store.list_for_user("mara").unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].saved_at > listed[1].saved_at);
    assert!(listed.iter().all(|record| record.username == "mara"));
}

#[test]
fn latest_unfinished_skips_completed_saves() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStore::new(dir.path());
    store.save(&record_at("mara", 2025, 3, 1, false)).unwrap();
    store.save(&record_at("mara", 2025, 3, 2, true)).unwrap();

    let resumable = store.latest_unfinished("mara").unwrap().unwrap();
    assert!(!resumable.is_completed);
    assert_eq!(
        resumable.saved_at,
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 0).unwrap()
    );
}

#[test]
fn delete_for_user_removes_only_their_saves() {
    let dir = tempfile::tempdir().unwrap();
    let store = GameStore::new(dir.path());
    store.save(&record_at("mara", 2025, 3, 1, false)).unwrap();
    store.save(&record_at("finn", 2025, 3, 2, false)).unwrap();

    store.delete_for_user("mara").unwrap();
    assert!(store.list_for_user("mara").unwrap().is_empty());
    assert_eq!(store.list_for_user("finn").unwrap().len(), 1);
}
