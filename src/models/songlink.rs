use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonglinkResponse {
    pub page_url: String,
    #[serde(default, deserialize_with = "entities_in_document_order")]
    pub entities_by_unique_id: Vec<Entity>,
    #[serde(default)]
    pub links_by_platform: LinksByPlatform,
}

/// One per-platform representation of the song. Songlink does not promise
/// any of these fields, so they all come in optional.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub thumbnail_width: u32,
    #[serde(default)]
    pub thumbnail_height: u32,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksByPlatform {
    pub spotify: Option<PlatformLink>,
    pub youtube_music: Option<PlatformLink>,
    pub apple_music: Option<PlatformLink>,
    pub soundcloud: Option<PlatformLink>,
    pub google: Option<PlatformLink>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLink {
    pub url: String,
    pub entity_unique_id: Option<String>,
}

/// `entitiesByUniqueId` is a json object keyed by ids we never use. Thumbnail
/// selection depends on which entity comes first, so the values are collected
/// in document order instead of going through a map type.
fn entities_in_document_order<'de, D>(deserializer: D) -> Result<Vec<Entity>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntityMap;

    impl<'de> Visitor<'de> for EntityMap {
        type Value = Vec<Entity>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of entity unique ids to entities")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entities = Vec::with_capacity(access.size_hint().unwrap_or(0));

            while let Some((_, entity)) = access.next_entry::<String, Entity>()? {
                entities.push(entity);
            }

            Ok(entities)
        }
    }

    deserializer.deserialize_map(EntityMap)
}
