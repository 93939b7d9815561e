use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Link image assets stored on local disk.
pub struct ImageService {
    images_dir: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(images_path: &str) -> Self {
        Self {
            images_dir: PathBuf::from(images_path),
        }
    }

    /// Resolves a stored image reference; anything but a bare filename is refused.
    #[must_use]
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        let name = Path::new(filename).file_name()?;
        if name != filename || filename == ".." {
            return None;
        }
        Some(self.images_dir.join(name))
    }

    /// Deletes the image file if it exists. Failures are logged only.
    pub async fn remove(&self, filename: &str) {
        let Some(path) = self.path_for(filename) else {
            warn!(image = %filename, "Refusing to remove image outside the images directory");
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => info!(path = %path.display(), "Removed link image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove link image"),
        }
    }
}
