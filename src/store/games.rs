use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::write_atomic;
use crate::error::Result;
use crate::snapshot::SavedRound;

const SAVED_GAMES_DIR: &str = "saved_games";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One JSON file per saved round, named `{username}_{timestamp}.json` with
/// the username sanitized for the filesystem.
pub struct GameStore {
    dir: PathBuf,
}

impl GameStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        GameStore {
            dir: data_dir.as_ref().join(SAVED_GAMES_DIR),
        }
    }

    /// Write errors propagate to the caller; nothing is retried here.
    pub fn save(&self, record: &SavedRound) -> Result<PathBuf> {
        let file_name = format!(
            "{}_{}.json",
            sanitize_username(&record.username),
            record.saved_at.format(TIMESTAMP_FORMAT)
        );
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(record)?;
        write_atomic(&path, &json)?;
        Ok(path)
    }

    /// Every readable save for the user, newest first. Unreadable or corrupt
    /// files are skipped with a warning instead of failing the whole listing.
    pub fn list_for_user(&self, username: &str) -> Result<Vec<SavedRound>> {
        let mut records = Vec::new();
        for path in self.files_for_user(username)? {
            match read_record(&path) {
                Ok(record) if record.username == username => records.push(record),
                Ok(record) => {
                    warn!(
                        file = %path.display(),
                        owner = %record.username,
                        "save file owner mismatch, skipped"
                    );
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "unreadable save file skipped");
                }
            }
        }
        records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(records)
    }

    /// Newest save that has not been played to completion.
    pub fn latest_unfinished(&self, username: &str) -> Result<Option<SavedRound>> {
        Ok(self
            .list_for_user(username)?
            .into_iter()
            .find(|record| !record.is_completed))
    }

    /// Removes every save file belonging to the user, used when a profile is
    /// deleted.
    pub fn delete_for_user(&self, username: &str) -> Result<()> {
        for path in self.files_for_user(username)? {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn files_for_user(&self, username: &str) -> Result<Vec<PathBuf>> {
        let prefix = format!("{}_", sanitize_username(username));
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.starts_with(&prefix) && name.ends_with(".json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn read_record(path: &Path) -> Result<SavedRound> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn sanitize_username(raw: &str) -> String {
    raw.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_alphanumerics_only() {
        assert_eq!(sanitize_username("ada"), "ada");
        assert_eq!(sanitize_username("a da/7!"), "a_da_7_");
    }
}
