use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::constants::{ALIGNMENT_CSS, SCROLL_JS, STYLE_CSS};
use crate::error::{ChatError, Result};

/// Style sheets and scroll script inlined into every rendered page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Assets {
    pub style_css: String,
    pub alignment_css: String,
    pub scroll_js: String,
}

impl Assets {
    /// Reads all three files from `dir`. Any missing file is an error naming
    /// that file; the server does not start without them.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let assets = Self {
            style_css: read_asset(dir.join(STYLE_CSS)).await?,
            alignment_css: read_asset(dir.join(ALIGNMENT_CSS)).await?,
            scroll_js: read_asset(dir.join(SCROLL_JS)).await?,
        };
        info!("Loaded assets from {}", dir.display());
        Ok(assets)
    }
}

async fn read_asset(path: PathBuf) -> Result<String> {
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ChatError::Asset { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_all(dir: &Path) {
        fs::write(dir.join(STYLE_CSS), "body { margin: 0; }").unwrap();
        fs::write(dir.join(ALIGNMENT_CSS), ".chat-user { text-align: right; }").unwrap();
        fs::write(dir.join(SCROLL_JS), "window.scrollTo(0, document.body.scrollHeight);").unwrap();
    }

    #[tokio::test]
    async fn test_load_reads_all_files() {
        let temp_dir = TempDir::new().unwrap();
        write_all(temp_dir.path());

        let assets = Assets::load(temp_dir.path()).await.unwrap();
        assert_eq!(assets.style_css, "body { margin: 0; }");
        assert!(assets.alignment_css.contains("chat-user"));
        assert!(assets.scroll_js.contains("scrollTo"));
    }

    #[tokio::test]
    async fn test_missing_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        write_all(temp_dir.path());
        fs::remove_file(temp_dir.path().join(SCROLL_JS)).unwrap();

        let err = Assets::load(temp_dir.path()).await.unwrap_err();
        match &err {
            ChatError::Asset { path, source } => {
                assert!(path.ends_with(SCROLL_JS));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(SCROLL_JS));
    }
}
