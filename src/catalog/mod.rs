// Lesson catalog - the static tree of manifests and media the player browses.
//
//   {base}/index.json                      list of lessons
//   {base}/{lesson}/config.json            sub-units and sub-sections of one lesson
//   {base}/{lesson}[/{unit}][/{section}]/audio.<ext>, image.<ext>

pub mod locator;

pub use locator::ResourceLocator;

use crate::audio::{AudioFormat, MediaSource};
use crate::config::ContentConfig;
use crate::error::CatalogError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Entry of the lesson index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSummary {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Per-lesson manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonConfig {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "anuvakams", deserialize_with = "nullable_list")]
    pub sub_units: Vec<SubUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubUnit {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default, rename = "panasas", deserialize_with = "nullable_list")]
    pub sub_sections: Vec<SubSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSection {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
}

impl LessonConfig {
    /// Lessons without sub-units are played directly.
    pub fn is_direct(&self) -> bool {
        self.sub_units.is_empty()
    }
}

// Hand-edited manifests use both `"id": "3"` and `"id": 3`.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Where the lesson tree is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Local(PathBuf),
    Remote(String),
}

impl ContentSource {
    pub fn parse(base: &str) -> Self {
        if base.starts_with("http://") || base.starts_with("https://") {
            ContentSource::Remote(base.trim_end_matches('/').to_string())
        } else {
            ContentSource::Local(PathBuf::from(base))
        }
    }

    /// Full locator of a path relative to the base, as shown to the user.
    pub fn resolve(&self, relative: &str) -> String {
        match self {
            ContentSource::Local(root) => root.join(relative).to_string_lossy().into_owned(),
            ContentSource::Remote(root) => format!("{}/{}", root, relative),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    source: ContentSource,
    audio_extension: String,
    image_extension: String,
}

impl Catalog {
    pub fn new(source: ContentSource, audio_extension: &str, image_extension: &str) -> Self {
        if !AudioFormat::from_extension(audio_extension).is_supported() {
            warn!("Audio extension '{}' is not a format the player can decode", audio_extension);
        }
        Self {
            source,
            audio_extension: audio_extension.trim_start_matches('.').to_string(),
            image_extension: image_extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(content: &ContentConfig) -> Self {
        Self::new(
            ContentSource::parse(&content.base),
            &content.audio_extension,
            &content.image_extension,
        )
    }

    pub fn audio_uri(&self, locator: &ResourceLocator) -> String {
        self.source.resolve(&locator.audio_path(&self.audio_extension))
    }

    pub fn image_uri(&self, locator: &ResourceLocator) -> String {
        self.source.resolve(&locator.image_path(&self.image_extension))
    }

    /// The lesson index. Any failure degrades to an empty list.
    pub async fn load_index(&self) -> Vec<LessonSummary> {
        match self.read_json::<Vec<LessonSummary>>("index.json").await {
            Ok(lessons) => {
                info!(
                    "Loaded {} lessons from {}",
                    lessons.len(),
                    self.source.resolve("index.json")
                );
                lessons
            }
            Err(e) => {
                error!("Error loading lessons index: {}", e);
                Vec::new()
            }
        }
    }

    /// One lesson's manifest, `None` when it is missing or malformed.
    pub async fn load_lesson_config(&self, lesson_id: &str) -> Option<LessonConfig> {
        let relative = format!("{}/config.json", lesson_id);
        match self.read_json::<LessonConfig>(&relative).await {
            Ok(config) => {
                debug!(
                    "Lesson {} has {} sub-units",
                    lesson_id,
                    config.sub_units.len()
                );
                Some(config)
            }
            Err(e) => {
                error!("Error loading lesson config: {}", e);
                None
            }
        }
    }

    pub async fn fetch_audio(
        &self,
        locator: &ResourceLocator,
    ) -> Result<MediaSource, CatalogError> {
        let relative = locator.audio_path(&self.audio_extension);
        let bytes = self.read(&relative).await?;
        debug!("Fetched {} bytes for {}", bytes.len(), relative);
        Ok(MediaSource::new(self.source.resolve(&relative), bytes))
    }

    async fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, CatalogError> {
        let bytes = self.read(relative).await?;
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Manifest {
            location: self.source.resolve(relative),
            source,
        })
    }

    async fn read(&self, relative: &str) -> Result<Vec<u8>, CatalogError> {
        match &self.source {
            ContentSource::Local(root) => {
                let path = root.join(relative);
                tokio::fs::read(&path).await.map_err(|source| {
                    if source.kind() == std::io::ErrorKind::NotFound {
                        CatalogError::NotFound(path.to_string_lossy().into_owned())
                    } else {
                        CatalogError::Io { path, source }
                    }
                })
            }
            ContentSource::Remote(_) => self.read_remote(relative).await,
        }
    }

    #[cfg(feature = "remote")]
    async fn read_remote(&self, relative: &str) -> Result<Vec<u8>, CatalogError> {
        let url = self.source.resolve(relative);
        let response = reqwest::get(&url).await.map_err(|source| CatalogError::Http {
            url: url.clone(),
            source,
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url));
        }
        let response = response.error_for_status().map_err(|source| CatalogError::Http {
            url: url.clone(),
            source,
        })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Http { url, source })?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "remote"))]
    async fn read_remote(&self, relative: &str) -> Result<Vec<u8>, CatalogError> {
        Err(CatalogError::RemoteDisabled(self.source.resolve(relative)))
    }
}
