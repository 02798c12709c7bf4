use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
    #[serde(rename = "album_image")]
    pub album_image_url: Option<String>,
    pub preview_url: Option<String>,
    /// User rating, 1..=5. None until the user rates the song.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Song {
    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

/// A song paired with a human-readable justification and, when known, the
/// genre or emotion that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub title: String,
    pub artist: String,
    #[serde(rename = "album_image")]
    pub album_image_url: Option<String>,
    pub preview_url: Option<String>,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Genre(String),
    Emotion(String),
    Ratings,
}

impl Recommendation {
    pub fn from_song(song: &Song, explanation: String, provenance: Option<Provenance>) -> Self {
        Recommendation {
            id: song.id,
            title: song.title.clone(),
            artist: song.artist.clone(),
            album_image_url: song.album_image_url.clone(),
            preview_url: song.preview_url.clone(),
            explanation,
            provenance,
        }
    }
}
