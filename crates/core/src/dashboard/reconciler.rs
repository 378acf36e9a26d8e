//! Applies broadcast change events to a session-local view.

use crate::events::ChangeEvent;
use crate::registrations::Registration;
use crate::settings::{SettingKey, SettingsMap};

/// The reconciled state of one dashboard session.
///
/// Ordering invariant: `items` is newest first; `apply` preserves each
/// record's position on update. The server's store stays the single source
/// of truth — this view converges on it and any gap (missed events while
/// disconnected) is fixed by a full [`DashboardState::resync`], never by
/// synthesizing records.
pub struct DashboardState {
    category: Option<String>,
    items: Vec<Registration>,
    settings: SettingsMap,
}

impl DashboardState {
    pub fn new(category: Option<String>) -> Self {
        Self {
            category,
            items: Vec::new(),
            settings: SettingsMap::new(),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn items(&self) -> &[Registration] {
        &self.items
    }

    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    /// Replaces the whole view after a (re)connect fetch.
    pub fn resync(&mut self, items: Vec<Registration>, settings: SettingsMap) {
        self.items = items;
        self.settings = settings;
    }

    /// Whether an event scoped to `category` belongs on this dashboard.
    fn accepts(&self, category: Option<&str>) -> bool {
        match self.category.as_deref() {
            None => true,
            Some(own) => category == Some(own),
        }
    }

    /// Applies one broadcast event. Returns `true` when the view changed
    /// and derived statistics should be recomputed.
    pub fn apply(&mut self, event: &ChangeEvent) -> bool {
        match event {
            ChangeEvent::Created { registration } => {
                if !self.accepts(registration.category.as_deref()) {
                    return false;
                }
                // Duplicate create events for a known id are ignored.
                if self.items.iter().any(|r| r.id == registration.id) {
                    return false;
                }
                self.items.insert(0, registration.clone());
                true
            }
            ChangeEvent::Updated { registration } => {
                if !self.accepts(registration.category.as_deref()) {
                    return false;
                }
                // An update for an unknown id means we missed the create;
                // the next resync resolves it.
                match self.items.iter_mut().find(|r| r.id == registration.id) {
                    Some(slot) => {
                        *slot = registration.clone();
                        true
                    }
                    None => false,
                }
            }
            ChangeEvent::Deleted { id, .. } => {
                let before = self.items.len();
                self.items.retain(|r| r.id != *id);
                self.items.len() != before
            }
            ChangeEvent::Cleared { category } => match category {
                None => {
                    let had_items = !self.items.is_empty();
                    self.items.clear();
                    had_items
                }
                Some(_) if !self.accepts(category.as_deref()) => false,
                Some(_) => {
                    let had_items = !self.items.is_empty();
                    self.items.clear();
                    had_items
                }
            },
            ChangeEvent::SettingChanged { key, value } => {
                self.settings.insert(key.clone(), value.clone());
                // Label-affecting keys always warrant a re-render.
                SettingKey::parse(key).is_ok()
            }
        }
    }
}
