//! Persisted light/dark theme preference.

use super::KeyValueStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Store key holding the theme token.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_token(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_token(token: &str) -> Option<Theme> {
        match token {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Reads the stored preference. An absent or unrecognized token falls
    /// back to the default.
    pub async fn load(store: &dyn KeyValueStore) -> Theme {
        match store.get(THEME_KEY).await {
            Ok(Some(token)) => Theme::from_token(token.trim()).unwrap_or_default(),
            _ => Theme::default(),
        }
    }

    pub async fn save(self, store: &dyn KeyValueStore) -> Result<()> {
        store.put(THEME_KEY, self.as_token()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_default_is_dark() {
        let store = MemoryStore::new();
        assert_eq!(Theme::load(&store).await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let store = MemoryStore::new();
        Theme::Light.save(&store).await.unwrap();
        assert_eq!(Theme::load(&store).await, Theme::Light);
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_unrecognized_token_falls_back_to_default() {
        let store = MemoryStore::new();
        store.put(THEME_KEY, "solarized").await.unwrap();
        assert_eq!(Theme::load(&store).await, Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
