use crate::config::{Config, FourthPlatform};
use crate::constants::{AUTHOR_ICON, DEFAULT_REQUESTER, NOT_AVAILABLE, SPACER};
use crate::error::ShareError;
use crate::models::webhook::{Embed, EmbedAuthor, EmbedField, EmbedImage, WebhookMessage};
use crate::songlink::{SonglinkClient, SongRecord};

/// Resolves the url, then delivers the share card to the webhook unless the
/// caller asked for a direct render. The two outbound calls are strictly
/// sequential; the returned record backs the response metadata either way.
pub async fn share_song(
    songlink: &SonglinkClient,
    http: &reqwest::Client,
    config: &Config,
    song_url: &str,
    requester: Option<&str>,
    direct: bool,
) -> Result<SongRecord, ShareError> {
    let record = songlink.resolve(song_url).await?;

    if !direct {
        let message = build_message(&record, requester_or_default(requester), config);
        deliver(http, &config.webhook_url, &message).await?;
        tracing::info!(title = %record.title, "shared a new song to the webhook");
    }

    Ok(record)
}

pub fn requester_or_default(requester: Option<&str>) -> &str {
    match requester {
        Some(requester) if !requester.is_empty() => requester,
        _ => DEFAULT_REQUESTER,
    }
}

/// Builds the webhook payload for a resolved song. The field grid is fixed:
/// YouTube Music and Spotify on the first row, an invisible spacer to force
/// the row break, then Apple Music and the configured fourth platform.
pub fn build_message(record: &SongRecord, requester: &str, config: &Config) -> WebhookMessage {
    let (fourth_name, fourth_url) = match config.fourth_platform {
        FourthPlatform::GooglePlayMusic => ("Google Play Music", record.links.google.as_deref()),
        FourthPlatform::Soundcloud => ("Soundcloud", record.links.soundcloud.as_deref()),
    };

    WebhookMessage {
        username: config.username.clone(),
        avatar_url: config.avatar_url.clone(),
        content: format!("{requester} shared a new song!"),
        embeds: vec![Embed {
            author: EmbedAuthor {
                name: format!("Shared by {requester}"),
                icon_url: AUTHOR_ICON.to_string(),
            },
            title: record.title.clone(),
            url: record.page_url.clone(),
            fields: vec![
                link_field("YouTube Music", record.links.youtube_music.as_deref()),
                link_field("Spotify", record.links.spotify.as_deref()),
                spacer_field(),
                link_field("Apple Music", record.links.apple_music.as_deref()),
                link_field(fourth_name, fourth_url),
            ],
            image: EmbedImage {
                url: record.thumbnail_url.clone(),
            },
        }],
    }
}

fn link_field(name: &str, url: Option<&str>) -> EmbedField {
    let value = match url {
        Some(url) => format!("[Link]({url})"),
        None => NOT_AVAILABLE.to_string(),
    };

    EmbedField {
        name: name.to_string(),
        value,
        inline: true,
    }
}

fn spacer_field() -> EmbedField {
    EmbedField {
        name: SPACER.to_string(),
        value: SPACER.to_string(),
        inline: false,
    }
}

/// Posts the message to the webhook as json. A non-success answer is a
/// delivery failure carrying the endpoint's status text and body verbatim.
pub async fn deliver(
    client: &reqwest::Client,
    webhook_url: &str,
    message: &WebhookMessage,
) -> Result<(), ShareError> {
    let resp = client
        .post(webhook_url)
        .json(message)
        .send()
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when posting to the webhook"),
        )?;

    let status = resp.status();
    if !status.is_success() {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        let body = resp.text().await.unwrap_or_default();

        tracing::error!(status = %status, body = %body, "the webhook rejected the message");

        return Err(ShareError::Delivery {
            status: status_text,
            body,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::songlink::PlatformLinks;

    fn config() -> Config {
        Config {
            songlink_api_base: "https://api.song.link/v1-alpha.1".to_string(),
            webhook_url: "https://discordapp.com/api/webhooks/test".to_string(),
            username: "Music Man".to_string(),
            avatar_url: "https://i.imgur.com/I9xBxse.jpg".to_string(),
            fourth_platform: FourthPlatform::Soundcloud,
            port: 8080,
        }
    }

    fn record(links: PlatformLinks) -> SongRecord {
        SongRecord {
            title: "song by artist".to_string(),
            page_url: "https://song.link/abc".to_string(),
            thumbnail_url: "https://img.example/big.jpg".to_string(),
            links,
        }
    }

    fn full_links() -> PlatformLinks {
        PlatformLinks {
            spotify: Some("https://open.spotify.com/track/abc".to_string()),
            youtube_music: Some("https://music.youtube.com/watch?v=abc".to_string()),
            apple_music: Some("https://music.apple.com/us/album/abc".to_string()),
            soundcloud: Some("https://soundcloud.com/abc".to_string()),
            google: Some("https://play.google.com/music/abc".to_string()),
        }
    }

    #[test]
    fn message_has_five_fields_in_fixed_order() {
        let message = build_message(&record(full_links()), "rylie", &config());
        let fields = &message.embeds[0].fields;

        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].name, "YouTube Music");
        assert_eq!(fields[1].name, "Spotify");
        assert_eq!(fields[2].name, SPACER);
        assert_eq!(fields[3].name, "Apple Music");
        assert_eq!(fields[4].name, "Soundcloud");
    }

    #[test]
    fn field_count_is_fixed_even_with_no_links() {
        let message = build_message(&record(PlatformLinks::default()), "rylie", &config());
        let fields = &message.embeds[0].fields;

        assert_eq!(fields.len(), 5);
        for field in [&fields[0], &fields[1], &fields[3], &fields[4]] {
            assert_eq!(field.value, NOT_AVAILABLE);
        }
    }

    #[test]
    fn present_links_render_as_markdown() {
        let message = build_message(&record(full_links()), "rylie", &config());
        let fields = &message.embeds[0].fields;

        assert_eq!(
            fields[1].value,
            "[Link](https://open.spotify.com/track/abc)"
        );
        assert_eq!(fields[4].value, "[Link](https://soundcloud.com/abc)");
    }

    #[test]
    fn spacer_is_invisible_and_not_inline() {
        let message = build_message(&record(full_links()), "rylie", &config());
        let spacer = &message.embeds[0].fields[2];

        assert_eq!(spacer.name, spacer.value);
        assert!(!spacer.inline);
        assert!(message.embeds[0].fields[0].inline);
    }

    #[test]
    fn fourth_platform_follows_config() {
        let mut config = config();
        config.fourth_platform = FourthPlatform::GooglePlayMusic;

        let message = build_message(&record(full_links()), "rylie", &config);
        let fourth = &message.embeds[0].fields[4];

        assert_eq!(fourth.name, "Google Play Music");
        assert_eq!(fourth.value, "[Link](https://play.google.com/music/abc)");
    }

    #[test]
    fn requester_shows_up_in_content_and_byline() {
        let message = build_message(&record(full_links()), "rylie", &config());

        assert_eq!(message.content, "rylie shared a new song!");
        assert_eq!(message.embeds[0].author.name, "Shared by rylie");
    }

    #[test]
    fn requester_defaults_to_someone() {
        assert_eq!(requester_or_default(None), "Someone");
        assert_eq!(requester_or_default(Some("")), "Someone");
        assert_eq!(requester_or_default(Some("rylie")), "rylie");
    }

    #[test]
    fn message_carries_record_title_and_image() {
        let message = build_message(&record(full_links()), "rylie", &config());
        let embed = &message.embeds[0];

        assert_eq!(embed.title, "song by artist");
        assert_eq!(embed.url, "https://song.link/abc");
        assert_eq!(embed.image.url, "https://img.example/big.jpg");
    }

    #[test]
    fn payload_serializes_with_webhook_key_names() {
        let message = build_message(&record(full_links()), "rylie", &config());
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["username"], "Music Man");
        assert_eq!(value["avatar_url"], "https://i.imgur.com/I9xBxse.jpg");
        assert_eq!(value["embeds"][0]["fields"][0]["name"], "YouTube Music");
        assert_eq!(value["embeds"][0]["image"]["url"], "https://img.example/big.jpg");
        assert_eq!(value["embeds"][0]["author"]["icon_url"], AUTHOR_ICON);
    }
}
