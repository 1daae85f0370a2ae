//! Per-client UI state: selected theme and active page.
//!
//! One [`AppState`] is created per `ConsoleClient` and injected into every
//! `Dashboard` that client builds. Only explicit user actions mutate it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// UI color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cyberpunk,
    Corporate,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Cyberpunk, Theme::Corporate];

    pub fn toggled(self) -> Self {
        match self {
            Theme::Cyberpunk => Theme::Corporate,
            Theme::Corporate => Theme::Cyberpunk,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Cyberpunk => "cyberpunk",
            Theme::Corporate => "corporate",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cyberpunk" => Ok(Theme::Cyberpunk),
            "corporate" => Ok(Theme::Corporate),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

/// Top-level navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Settings,
}

impl Tab {
    pub fn path(&self) -> &'static str {
        match self {
            Tab::Dashboard => "/",
            Tab::Settings => "/settings",
        }
    }
}

/// Shared handle to the selected theme.
///
/// Clones observe the same value. The lock is only held for a copy, so a
/// std lock is enough here.
#[derive(Debug, Clone, Default)]
pub struct ThemeState {
    inner: Arc<RwLock<Theme>>,
}

impl ThemeState {
    pub fn new(theme: Theme) -> Self {
        Self {
            inner: Arc::new(RwLock::new(theme)),
        }
    }

    pub fn get(&self) -> Theme {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set(&self, theme: Theme) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = theme;
    }

    /// Switches to the other theme and returns the new one.
    pub fn toggle(&self) -> Theme {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = guard.toggled();
        *guard
    }
}

/// Theme plus navigation state for one dashboard session.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    theme: ThemeState,
    active_tab: Arc<RwLock<Tab>>,
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme: ThemeState::new(theme),
            active_tab: Arc::new(RwLock::new(Tab::default())),
        }
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn active_tab(&self) -> Tab {
        *self.active_tab.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn navigate(&self, tab: Tab) {
        *self.active_tab.write().unwrap_or_else(|e| e.into_inner()) = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_state_is_shared_between_clones() {
        let state = AppState::new(Theme::Cyberpunk);
        let other = state.clone();
        other.theme().set(Theme::Corporate);
        assert_eq!(state.theme().get(), Theme::Corporate);
        assert_eq!(state.theme().toggle(), Theme::Cyberpunk);
        assert_eq!(other.theme().get(), Theme::Cyberpunk);
    }

    #[test]
    fn test_navigation() {
        let state = AppState::default();
        assert_eq!(state.active_tab(), Tab::Dashboard);
        state.navigate(Tab::Settings);
        assert_eq!(state.active_tab().path(), "/settings");
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("CORPORATE".parse::<Theme>().unwrap(), Theme::Corporate);
        assert!("solarized".parse::<Theme>().is_err());
    }
}
