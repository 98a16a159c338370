use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Serves files from the frontend build directory. Any path without a matching file
/// gets `index.html` so the client-side router can take over.
pub fn spa_service(frontend_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")))
}
