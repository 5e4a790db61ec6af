//! Embedded UI assets for single-binary distribution
//!
//! Uses rust-embed to compile the page (HTML, CSS, WASM bundle) into the binary.
//! In debug mode, files are loaded from disk for hot-reloading.
//! In release mode, files are embedded in the binary.

use rust_embed::RustEmbed;

/// Embedded UI assets from the ui/ directory
#[derive(RustEmbed)]
#[folder = "../ui/"]
#[include = "index.html"]
#[include = "style.css"]
#[include = "pkg/*.js"]
#[include = "pkg/*.wasm"]
pub struct UiAssets;

/// Get a file from embedded assets with proper MIME type
pub fn get_asset(path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Handle root path
    let path = if path.is_empty() || path == "/" {
        "index.html"
    } else {
        path.trim_start_matches('/')
    };

    UiAssets::get(path).map(|file| {
        let mime = if std::path::Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
        {
            "application/javascript"
        } else {
            mime_guess::from_path(path)
                .first_raw()
                .unwrap_or("application/octet-stream")
        };
        (file.data.into_owned(), mime)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_html_exists() {
        assert!(UiAssets::get("index.html").is_some());
    }

    #[test]
    fn test_get_asset() {
        let (data, mime) = get_asset("/").expect("index.html should exist");
        assert!(String::from_utf8_lossy(&data).contains("watchlist-container"));
        assert_eq!(mime, "text/html");

        let (_, css) = get_asset("style.css").expect("style.css should exist");
        assert_eq!(css, "text/css");
    }

    #[test]
    fn test_missing_asset() {
        assert!(get_asset("nope.txt").is_none());
    }
}
