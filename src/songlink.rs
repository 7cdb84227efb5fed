use crate::error::ShareError;
use crate::models::songlink::{Entity, SonglinkResponse};

/// A resolved song: one canonical record built from whatever set of
/// platform entities the lookup service knows about. Built fresh per
/// request and dropped with the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub title: String,
    pub page_url: String,
    pub thumbnail_url: String,
    pub links: PlatformLinks,
}

/// Per-platform urls, each independently optional. A platform missing from
/// the lookup response never fails the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformLinks {
    pub spotify: Option<String>,
    pub youtube_music: Option<String>,
    pub apple_music: Option<String>,
    pub soundcloud: Option<String>,
    pub google: Option<String>,
}

#[derive(Clone)]
pub struct SonglinkClient {
    api_base: String,
    client: reqwest::Client,
}

impl SonglinkClient {
    pub fn new(api_base: String, client: reqwest::Client) -> Self {
        SonglinkClient { api_base, client }
    }

    /// Looks up a streaming url and builds a [`SongRecord`] out of the
    /// response. A non-success answer means songlink could not match the
    /// url; nothing is retried.
    pub async fn resolve(&self, song_url: &str) -> Result<SongRecord, ShareError> {
        let url_encoded = urlencoding::encode(song_url);

        let resp = self
            .client
            .get(format!(
                "{}/links?url={}&userCountry=US",
                self.api_base, url_encoded
            ))
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when fetching song from songlink"),
            )?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %song_url, "songlink had no match for this url");
            return Err(ShareError::NotFound(format!("status {status}")));
        }

        let text = resp.text().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when receiving response text"),
        )?;

        let body: SonglinkResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(err = ?e, text = %text, "an error occurred when parsing songlink response");
            ShareError::Malformed(format!("undecodable body: {e}"))
        })?;

        build_record(body)
    }
}

/// Picks the title and thumbnail from the best entity and collects the
/// per-platform links. Pure so the selection rules stay testable without a
/// live songlink endpoint.
pub fn build_record(response: SonglinkResponse) -> Result<SongRecord, ShareError> {
    let best = select_best_entity(&response.entities_by_unique_id)
        .ok_or_else(|| ShareError::NotFound("no entities returned".to_string()))?;

    let title = match (&best.title, &best.artist_name) {
        (Some(title), Some(artist)) => format!("{} by {}", title, artist),
        _ => {
            return Err(ShareError::Malformed(
                "missing title or artist name".to_string(),
            ))
        }
    };

    let thumbnail_url = best
        .thumbnail_url
        .clone()
        .ok_or_else(|| ShareError::Malformed("missing thumbnail url".to_string()))?;

    let links = &response.links_by_platform;

    Ok(SongRecord {
        title,
        page_url: response.page_url,
        thumbnail_url,
        links: PlatformLinks {
            spotify: links.spotify.as_ref().map(|link| link.url.clone()),
            youtube_music: links.youtube_music.as_ref().map(|link| link.url.clone()),
            apple_music: links.apple_music.as_ref().map(|link| link.url.clone()),
            soundcloud: links.soundcloud.as_ref().map(|link| link.url.clone()),
            google: links.google.as_ref().map(|link| link.url.clone()),
        },
    })
}

/// The first entity always seeds the pick. A later entity displaces it when
/// either dimension is strictly larger, so a wider-but-shorter image can win
/// over a taller-but-narrower one; ties keep the earlier entity.
fn select_best_entity(entities: &[Entity]) -> Option<&Entity> {
    let mut best: Option<&Entity> = None;

    for entity in entities {
        match best {
            None => best = Some(entity),
            Some(current)
                if entity.thumbnail_width > current.thumbnail_width
                    || entity.thumbnail_height > current.thumbnail_height =>
            {
                best = Some(entity);
            }
            _ => {}
        }
    }

    best
}
