use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::write_atomic;
use crate::error::Result;

const USERS_FILE_NAME: &str = "users.json";

/// Player profile with lifetime statistics. Counters only ever grow, bumped
/// once per completed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub image_path: String,
    pub games_played: u32,
    pub games_won: u32,
}

impl User {
    pub fn new(username: impl Into<String>, image_path: impl Into<String>) -> Self {
        User {
            username: username.into(),
            image_path: image_path.into(),
            games_played: 0,
            games_won: 0,
        }
    }
}

/// Profile list persisted as one JSON file under the data directory.
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        UserStore {
            path: data_dir.as_ref().join(USERS_FILE_NAME),
        }
    }

    /// A missing file reads as an empty profile list.
    pub fn load(&self) -> Result<Vec<User>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, users: &[User]) -> Result<()> {
        let json = serde_json::to_string_pretty(users)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|user| user.username == username))
    }

    /// Replaces the profile with the same username or appends a new one.
    pub fn upsert(&self, user: User) -> Result<()> {
        let mut users = self.load()?;
        match users.iter_mut().find(|u| u.username == user.username) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        self.save(&users)
    }

    pub fn delete(&self, username: &str) -> Result<()> {
        let mut users = self.load()?;
        users.retain(|user| user.username != username);
        self.save(&users)
    }

    /// Bumps played (and won, on a win) for one completed round. A result
    /// for an unknown profile is dropped with a warning.
    pub fn record_result(&self, username: &str, won: bool) -> Result<()> {
        let mut users = self.load()?;
        let Some(user) = users.iter_mut().find(|u| u.username == username) else {
            warn!(username, "round result for unknown profile dropped");
            return Ok(());
        };
        user.games_played += 1;
        if won {
            user.games_won += 1;
        }
        self.save(&users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn upsert_replaces_by_username() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        store.upsert(User::new("ada", "ada.png")).unwrap();
        store.upsert(User::new("brin", "brin.png")).unwrap();

        let mut ada = store.find("ada").unwrap().unwrap();
        ada.image_path = "other.png".to_string();
        store.upsert(ada).unwrap();

        let users = store.load().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].image_path, "other.png");
    }

    #[test]
    fn record_result_bumps_counters_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        store.upsert(User::new("ada", "ada.png")).unwrap();

        store.record_result("ada", true).unwrap();
        store.record_result("ada", false).unwrap();

        let ada = store.find("ada").unwrap().unwrap();
        assert_eq!(ada.games_played, 2);
        assert_eq!(ada.games_won, 1);
    }

    #[test]
    fn record_result_for_unknown_profile_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        store.record_result("ghost", true).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn delete_removes_only_the_named_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        store.upsert(User::new("ada", "ada.png")).unwrap();
        store.upsert(User::new("brin", "brin.png")).unwrap();
        store.delete("ada").unwrap();
        let users = store.load().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "brin");
    }
}
