use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile as the client caches it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub alias: String,
    pub name: String,
    pub avatar: String,
    pub secondary_images: Vec<String>,
    pub biography: String,
    pub gender: i32,
    pub age: u32,
    pub birth_date: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_online: bool,
    pub is_active: bool,
    pub last_online: Option<DateTime<Utc>>,
}

/// Partial update for the session user's own profile. `None` fields
/// are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub alias: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub secondary_images: Option<Vec<String>>,
    pub biography: Option<String>,
    pub gender: Option<i32>,
    pub birth_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UserProfile {
    /// Merge a partial update into this profile in place.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(alias) = &patch.alias {
            self.alias = alias.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
        if let Some(images) = &patch.secondary_images {
            self.secondary_images = images.clone();
        }
        if let Some(biography) = &patch.biography {
            self.biography = biography.clone();
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(birth_date) = &patch.birth_date {
            self.birth_date = birth_date.clone();
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
    }
}

/// A nearby profile offered to the swipe deck, annotated with the
/// distance the geospatial query computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeCandidate {
    pub profile: UserProfile,
    pub distance_km: f64,
}
