//! App storage boundary.
//!
//! The production deployment keeps apps in a hosted relational store whose
//! row-level security filters every query by the owning user. `AppStore`
//! captures that contract; `MemoryAppStore` is the in-process stand-in and
//! applies the same owner filter on every operation.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::apps::model::{App, CreateApp, UpdateApp};

/// Row-filtered CRUD over the `apps` entity.
///
/// Every operation takes the caller's user id and only ever sees rows that
/// user owns; there is no way to reach another user's apps through this
/// trait.
pub trait AppStore: Send + Sync {
    /// All apps owned by `user_id`, newest first.
    fn list(&self, user_id: &str) -> Vec<App>;

    fn get(&self, user_id: &str, id: Uuid) -> Option<App>;

    fn create(&self, user_id: &str, payload: CreateApp) -> App;

    /// Apply the non-empty fields of `payload`; `None` if the row does not
    /// exist or belongs to someone else.
    fn update(&self, user_id: &str, id: Uuid, payload: UpdateApp) -> Option<App>;

    /// `true` if a row was removed.
    fn delete(&self, user_id: &str, id: Uuid) -> bool;
}

/// In-memory `AppStore` implementation.
pub struct MemoryAppStore {
    rows: DashMap<Uuid, App>,
}

impl MemoryAppStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }
}

impl Default for MemoryAppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore for MemoryAppStore {
    fn list(&self, user_id: &str) -> Vec<App> {
        let mut apps: Vec<App> = self
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.value().clone())
            .collect();
        apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        apps
    }

    fn get(&self, user_id: &str, id: Uuid) -> Option<App> {
        self.rows
            .get(&id)
            .filter(|row| row.user_id == user_id)
            .map(|row| row.value().clone())
    }

    fn create(&self, user_id: &str, payload: CreateApp) -> App {
        let now = Utc::now();
        let app = App {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: payload.name,
            html: payload.html,
            css: payload.css,
            js: payload.js,
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(app.id, app.clone());
        app
    }

    fn update(&self, user_id: &str, id: Uuid, payload: UpdateApp) -> Option<App> {
        let mut row = self.rows.get_mut(&id)?;
        if row.user_id != user_id {
            return None;
        }
        if let Some(name) = payload.name {
            row.name = name;
        }
        if let Some(html) = payload.html {
            row.html = html;
        }
        if let Some(css) = payload.css {
            row.css = css;
        }
        if let Some(js) = payload.js {
            row.js = js;
        }
        row.updated_at = Utc::now();
        Some(row.value().clone())
    }

    fn delete(&self, user_id: &str, id: Uuid) -> bool {
        self.rows
            .remove_if(&id, |_, row| row.user_id == user_id)
            .is_some()
    }
}
