use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::config::Category;

/// Art shown when a category has no usable images on disk.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

/// Collaborator boundary for listing the card art available to a category.
/// Implementations return opaque path strings; decoding is the UI's problem.
pub trait ImageCatalog {
    fn list_images(&self, category: Category) -> Vec<String>;
}

/// Catalog backed by a directory tree with one folder per category.
pub struct DirCatalog {
    root: PathBuf,
}

impl DirCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirCatalog { root: root.into() }
    }
}

impl ImageCatalog for DirCatalog {
    fn list_images(&self, category: Category) -> Vec<String> {
        let dir = self.root.join(category.folder());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => {
                warn!(dir = %dir.display(), "image directory missing");
                return Vec::new();
            }
        };

        let mut images = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png")
                });
            if is_image {
                images.push(path.to_string_lossy().into_owned());
            }
        }
        images.sort();
        images
    }
}
