use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::Config;
use crate::error::ShareError;
use crate::share;
use crate::songlink::{SonglinkClient, SongRecord};

static INDEX_HTML: &str = include_str!("../views/index.html");
static SUCCESS_HTML: &str = include_str!("../views/success.html");
static ERROR_HTML: &str = include_str!("../views/error.html");

/// Response metadata headers a front-end script can read without parsing
/// the html body.
const SONG_TITLE: HeaderName = HeaderName::from_static("song-title");
const SONG_IMAGE: HeaderName = HeaderName::from_static("song-image");
const SHARE_ERROR: HeaderName = HeaderName::from_static("share-error");

pub struct AppState {
    pub config: Config,
    pub songlink: SonglinkClient,
    pub http: reqwest::Client,
}

pub type SharedState = Arc<AppState>;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/share", get(share_heuristic))
        .fallback(unknown_path)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct ShareQuery {
    song: Option<String>,
    user: Option<String>,
    headers: Option<String>,
}

/// `GET /?song=` runs the share pipeline; without a song the index page is
/// served. `headers=true` opts out of webhook delivery and only renders the
/// outcome.
async fn root(State(state): State<SharedState>, Query(query): Query<ShareQuery>) -> Response {
    let Some(song) = query.song else {
        return Html(INDEX_HTML).into_response();
    };

    let direct = query.headers.as_deref() == Some("true");
    run_share(&state, Some(song), query.user, direct).await
}

/// `GET /share` does not name its parameter: the first query value that is
/// a well-formed url becomes the song.
async fn share_heuristic(
    State(state): State<SharedState>,
    RawQuery(query): RawQuery,
) -> Response {
    let pairs = query_pairs(query.as_deref().unwrap_or_default());
    let song = first_url_value(&pairs);
    let direct = pairs
        .iter()
        .any(|(name, value)| name == "headers" && value == "true");

    run_share(&state, song, None, direct).await
}

async fn unknown_path() -> Response {
    (StatusCode::BAD_REQUEST, "Error: Unknown Path").into_response()
}

async fn run_share(
    state: &AppState,
    song: Option<String>,
    user: Option<String>,
    direct: bool,
) -> Response {
    let result = match song {
        Some(song) if !song.is_empty() => {
            share::share_song(
                &state.songlink,
                &state.http,
                &state.config,
                &song,
                user.as_deref(),
                direct,
            )
            .await
        }
        _ => Err(ShareError::MissingInput),
    };

    match result {
        Ok(record) => success_response(&record),
        Err(err) => failure_response(&err),
    }
}

fn success_response(record: &SongRecord) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(SONG_TITLE, header_value(&record.title));
    headers.insert(SONG_IMAGE, header_value(&record.thumbnail_url));

    (StatusCode::OK, headers, Html(SUCCESS_HTML)).into_response()
}

fn failure_response(err: &ShareError) -> Response {
    let detail = error_detail(err);
    tracing::error!(err = %err, "could not share song");

    let mut headers = HeaderMap::new();
    headers.insert(SHARE_ERROR, header_value(&detail));

    (err.status(), headers, Html(ERROR_HTML)).into_response()
}

/// The caller-facing error text, raw detail included.
fn error_detail(err: &ShareError) -> String {
    match err {
        ShareError::MissingInput => {
            "Error: You must attach a song to share! ( ?song= )".to_string()
        }
        ShareError::Delivery { status, body } => {
            format!("Error: Couldn't share song... ( {status} )\n\n{body}")
        }
        other => format!("Error: Couldn't share song... ( {other} )"),
    }
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn first_url_value(pairs: &[(String, String)]) -> Option<String> {
    pairs
        .iter()
        .map(|(_, value)| value)
        .find(|value| is_well_formed_url(value))
        .cloned()
}

fn is_well_formed_url(value: &str) -> bool {
    Url::parse(value).map(|url| url.has_host()).unwrap_or(false)
}

/// Header values cannot carry control characters, so newlines in the detail
/// flatten to spaces. Everything else passes through untouched.
fn header_value(text: &str) -> HeaderValue {
    let sanitized: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    HeaderValue::from_str(sanitized.trim()).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_url_value_skips_non_urls() {
        let pairs = query_pairs("headers=true&title=some+song&u=https%3A%2F%2Fopen.spotify.com%2Ftrack%2Fabc");

        assert_eq!(
            first_url_value(&pairs).as_deref(),
            Some("https://open.spotify.com/track/abc")
        );
    }

    #[test]
    fn first_url_value_prefers_the_earliest_match() {
        let pairs = query_pairs("a=https%3A%2F%2Ffirst.example&b=https%3A%2F%2Fsecond.example");

        assert_eq!(first_url_value(&pairs).as_deref(), Some("https://first.example"));
    }

    #[test]
    fn first_url_value_is_none_without_urls() {
        let pairs = query_pairs("headers=true&text=not+a+url");

        assert_eq!(first_url_value(&pairs), None);
    }

    #[test]
    fn url_heuristic_requires_a_host() {
        assert!(is_well_formed_url("https://open.spotify.com/track/abc"));
        assert!(is_well_formed_url("http://song.link/abc"));
        assert!(!is_well_formed_url("spotify:track:abc"));
        assert!(!is_well_formed_url("some song name"));
        assert!(!is_well_formed_url(""));
    }

    #[test]
    fn header_values_flatten_control_characters() {
        let value = header_value("Error: Couldn't share song... ( Internal Server Error )\n\ninvalid token");

        assert_eq!(
            value.to_str().unwrap(),
            "Error: Couldn't share song... ( Internal Server Error )  invalid token"
        );
    }

    #[test]
    fn missing_input_keeps_the_original_hint() {
        assert_eq!(
            error_detail(&ShareError::MissingInput),
            "Error: You must attach a song to share! ( ?song= )"
        );
    }

    #[test]
    fn delivery_detail_carries_the_webhook_body() {
        let detail = error_detail(&ShareError::Delivery {
            status: "Internal Server Error".to_string(),
            body: "invalid token".to_string(),
        });

        assert_eq!(
            detail,
            "Error: Couldn't share song... ( Internal Server Error )\n\ninvalid token"
        );
    }

    #[test]
    fn resolution_detail_wraps_the_error() {
        let detail = error_detail(&ShareError::NotFound("status 404 Not Found".to_string()));

        assert_eq!(
            detail,
            "Error: Couldn't share song... ( song lookup failed: status 404 Not Found )"
        );
    }
}
