//! Web UI assets compiled into the binary.

use axum::http::HeaderValue;
use mime_guess::mime;

/// The single-page UI served at `/`.
pub const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// A file served under `/static/`.
#[derive(Debug)]
pub struct Asset {
    pub path: &'static str,
    pub body: &'static str,
}

impl Asset {
    /// Content type guessed from the file extension. Text types are UTF-8.
    pub fn content_type(&self) -> HeaderValue {
        let guess = mime_guess::from_path(self.path).first_or_octet_stream();
        let value = if guess.type_() == mime::TEXT && guess.get_param(mime::CHARSET).is_none() {
            format!("{}; charset=utf-8", guess.essence_str())
        } else {
            guess.to_string()
        };
        HeaderValue::from_str(&value)
            .unwrap_or(HeaderValue::from_static("application/octet-stream"))
    }
}

static STATIC_ASSETS: &[Asset] = &[
    Asset {
        path: "app.js",
        body: include_str!("../../assets/static/app.js"),
    },
    Asset {
        path: "style.css",
        body: include_str!("../../assets/static/style.css"),
    },
];

/// Find a static asset by its path relative to `/static/`.
pub fn lookup(path: &str) -> Option<&'static Asset> {
    let path = path.trim_start_matches('/');
    STATIC_ASSETS.iter().find(|a| a.path == path)
}
