#![forbid(unsafe_code)]

//! Light/dark theme toggle with persisted preference.
//!
//! The active theme is written to the root element as `data-theme`. The
//! toggle's icon shows the mode a click would switch to: a moon while light,
//! a sun while dark.

use std::fmt;

use tracing::{debug, warn};

use crate::dom::PageDom;
use crate::storage::PreferenceStore;

pub const THEME_ATTRIBUTE: &str = "data-theme";
const ICON_MOON: &str = "fa-moon";
const ICON_SUN: &str = "fa-sun";

/// Page color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored or displayed value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon class shown on the toggle while this theme is active.
    #[must_use]
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Light => ICON_MOON,
            Self::Dark => ICON_SUN,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme state bound to the root element, the toggle icon and the store.
#[derive(Debug, Clone)]
pub struct ThemeToggle<H> {
    root: Option<H>,
    button: Option<H>,
    icon: Option<H>,
    storage_key: String,
    current: Theme,
}

impl<H: Clone + PartialEq + fmt::Debug> ThemeToggle<H> {
    /// Bind to `#theme-toggle` and its `<i>` icon.
    pub fn bind<D>(dom: &D, storage_key: &str) -> Self
    where
        D: PageDom<Handle = H>,
    {
        let button = dom.by_id("theme-toggle");
        let icon = button.as_ref().and_then(|b| dom.query_in(b, "i"));
        if button.is_none() {
            debug!("theme toggle not present; theme is load-only");
        }
        Self {
            root: dom.root(),
            button,
            icon,
            storage_key: storage_key.to_string(),
            current: Theme::default(),
        }
    }

    #[must_use]
    pub fn button(&self) -> Option<&H> {
        self.button.as_ref()
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Read the saved preference (default light) and apply it.
    pub fn load<D, S>(&mut self, dom: &mut D, store: &mut S) -> Theme
    where
        D: PageDom<Handle = H>,
        S: PreferenceStore + ?Sized,
    {
        if !store.is_available() {
            debug!(store = store.name(), "preference store unavailable; using default theme");
            self.apply(dom, Theme::default());
            return Theme::default();
        }
        let saved = match store.get(&self.storage_key) {
            Ok(value) => value,
            Err(err) => {
                warn!(store = store.name(), error = %err, "could not read theme preference");
                None
            }
        };
        let theme = match saved.as_deref() {
            None => Theme::default(),
            Some(raw) => Theme::parse(raw).unwrap_or_else(|| {
                debug!(value = raw, "discarding unrecognized theme preference");
                if let Err(err) = store.remove(&self.storage_key) {
                    warn!(store = store.name(), error = %err, "could not clear theme preference");
                }
                Theme::default()
            }),
        };
        debug!(theme = %theme, "initial theme");
        self.apply(dom, theme);
        theme
    }

    /// Flip the displayed theme and persist the new value.
    pub fn toggle<D, S>(&mut self, dom: &mut D, store: &mut S) -> Theme
    where
        D: PageDom<Handle = H>,
        S: PreferenceStore + ?Sized,
    {
        let displayed = self
            .root
            .as_ref()
            .and_then(|root| dom.attribute(root, THEME_ATTRIBUTE))
            .and_then(|value| Theme::parse(&value))
            .unwrap_or(self.current);
        let next = displayed.toggled();
        self.apply(dom, next);
        if !store.is_available() {
            debug!(store = store.name(), "preference store unavailable; theme not persisted");
        } else if let Err(err) = store.set(&self.storage_key, next.as_str()) {
            warn!(store = store.name(), error = %err, "could not persist theme preference");
        }
        next
    }

    fn apply<D>(&mut self, dom: &mut D, theme: Theme)
    where
        D: PageDom<Handle = H>,
    {
        self.current = theme;
        if let Some(root) = &self.root {
            if let Err(err) = dom.set_attribute(root, THEME_ATTRIBUTE, theme.as_str()) {
                warn!(error = %err, "could not set data-theme");
            }
        }
        if let Some(icon) = &self.icon {
            let stale = theme.toggled().icon_class();
            let result = dom
                .remove_class(icon, stale)
                .and_then(|()| dom.add_class(icon, theme.icon_class()));
            if let Err(err) = result {
                warn!(error = %err, "could not update theme icon");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{ElementSpec, HeadlessDom, NodeId};
    use crate::storage::MemoryStore;

    fn page() -> (HeadlessDom, NodeId) {
        let mut dom = HeadlessDom::new();
        let body = dom.body();
        let button = dom.insert(body, ElementSpec::new("button").id("theme-toggle"));
        let icon = dom.insert(button, ElementSpec::new("i").class("fas").class("fa-moon"));
        (dom, icon)
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("solarized"), None);
    }

    #[test]
    fn absent_preference_defaults_to_light() {
        let (mut dom, icon) = page();
        let mut toggle = ThemeToggle::bind(&dom, "theme");
        assert_eq!(toggle.load(&mut dom, &mut MemoryStore::new()), Theme::Light);
        assert_eq!(dom.attribute(&dom.html(), THEME_ATTRIBUTE).as_deref(), Some("light"));
        assert!(dom.has_class(&icon, "fa-moon"));
    }

    #[test]
    fn garbage_preference_defaults_to_light() {
        let (mut dom, _) = page();
        let mut toggle = ThemeToggle::bind(&dom, "theme");
        let mut store = MemoryStore::with_entries([("theme", "purple")]);
        assert_eq!(toggle.load(&mut dom, &mut store), Theme::Light);
        assert_eq!(store.get("theme"), Ok(None));
    }

    #[test]
    fn unavailable_store_uses_default_and_skips_persisting() {
        let (mut dom, icon) = page();
        let mut store = MemoryStore::with_entries([("theme", "dark")]).disabled();
        let mut toggle = ThemeToggle::bind(&dom, "theme");
        assert_eq!(toggle.load(&mut dom, &mut store), Theme::Light);
        assert_eq!(toggle.toggle(&mut dom, &mut store), Theme::Dark);
        assert!(dom.has_class(&icon, "fa-sun"));
        assert_eq!(dom.attribute(&dom.html(), THEME_ATTRIBUTE).as_deref(), Some("dark"));
    }

    #[test]
    fn toggle_swaps_icon_and_persists() {
        let (mut dom, icon) = page();
        let mut store = MemoryStore::new();
        let mut toggle = ThemeToggle::bind(&dom, "theme");
        toggle.load(&mut dom, &mut store);

        assert_eq!(toggle.toggle(&mut dom, &mut store), Theme::Dark);
        assert!(dom.has_class(&icon, "fa-sun"));
        assert!(!dom.has_class(&icon, "fa-moon"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn toggle_follows_displayed_attribute() {
        let (mut dom, _) = page();
        let mut store = MemoryStore::new();
        let mut toggle = ThemeToggle::bind(&dom, "theme");
        toggle.load(&mut dom, &mut store);
        let html = dom.html();
        dom.set_attribute(&html, THEME_ATTRIBUTE, "dark").unwrap();
        assert_eq!(toggle.toggle(&mut dom, &mut store), Theme::Light);
    }

    #[test]
    fn failed_write_still_flips_display() {
        let (mut dom, _) = page();
        let mut store = MemoryStore::new().read_only();
        let mut toggle = ThemeToggle::bind(&dom, "theme");
        toggle.load(&mut dom, &mut store);
        assert_eq!(toggle.toggle(&mut dom, &mut store), Theme::Dark);
        assert_eq!(dom.attribute(&dom.html(), THEME_ATTRIBUTE).as_deref(), Some("dark"));
        assert_eq!(store.get("theme"), Ok(None));
    }
}
