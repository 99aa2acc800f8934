//! JSON file I/O for page documents.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::page::Page;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse page file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write `page` as pretty JSON, bumping its version and `updated_at` first.
///
/// Missing parent directories are created.
pub fn save_page(page: &mut Page, path: &Path) -> Result<(), PageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PageError::io(parent, e))?;
    }

    page.touch();
    let json = serde_json::to_string_pretty(page).map_err(|e| PageError::json(path, e))?;
    std::fs::write(path, json).map_err(|e| PageError::io(path, e))?;
    info!(
        "Saved page {:?} (v{}, {} components) to {:?}",
        page.name,
        page.version,
        page.component_count(),
        path
    );
    Ok(())
}

pub fn load_page(path: &Path) -> Result<Page, PageError> {
    let json = std::fs::read_to_string(path).map_err(|e| PageError::io(path, e))?;
    let page: Page = serde_json::from_str(&json).map_err(|e| PageError::json(path, e))?;
    debug!(
        "Parsed page {:?} with {} components",
        page.name,
        page.component_count()
    );
    Ok(page)
}
