//! App row and request payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One saved app: an HTML/CSS/JS bundle owned by a user.
#[derive(Debug, Clone, Serialize)]
pub struct App {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub name: String,
    pub html: String,
    pub css: String,
    pub js: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/apps/create`. Only the name is required.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApp {
    pub name: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

/// Body of `PUT /api/apps/{id}/update`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApp {
    pub name: Option<String>,
    pub html: Option<String>,
    pub css: Option<String>,
    pub js: Option<String>,
}
