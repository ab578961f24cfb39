#![forbid(unsafe_code)]

//! Scroll-offset chrome: the navbar `scrolled` state and the scroll-to-top
//! control.

use std::fmt;

use tracing::warn;

use crate::config::ScrollConfig;
use crate::dom::PageDom;

pub const SCROLLED_CLASS: &str = "scrolled";
pub const VISIBLE_CLASS: &str = "visible";

#[derive(Debug, Clone)]
pub struct ScrollChrome<H> {
    navbar: Option<H>,
    scroll_top: Option<H>,
    navbar_threshold: f64,
    scroll_top_threshold: f64,
}

impl<H: Clone + PartialEq + fmt::Debug> ScrollChrome<H> {
    pub fn bind<D: PageDom<Handle = H>>(dom: &D, config: &ScrollConfig) -> Self {
        Self {
            navbar: dom.by_id("navbar"),
            scroll_top: dom.by_id("scroll-top"),
            navbar_threshold: config.navbar_threshold,
            scroll_top_threshold: config.scroll_top_threshold,
        }
    }

    #[must_use]
    pub fn scroll_top_button(&self) -> Option<&H> {
        self.scroll_top.as_ref()
    }

    pub fn on_scroll<D: PageDom<Handle = H>>(&self, dom: &mut D, scroll_y: f64) {
        if let Some(navbar) = &self.navbar {
            set_flag(dom, navbar, SCROLLED_CLASS, scroll_y > self.navbar_threshold);
        }
        if let Some(button) = &self.scroll_top {
            set_flag(dom, button, VISIBLE_CLASS, scroll_y > self.scroll_top_threshold);
        }
    }

    /// Scroll-to-top click.
    pub fn on_scroll_top_click<D: PageDom<Handle = H>>(&self, dom: &mut D) {
        if let Err(err) = dom.scroll_to_top() {
            warn!(error = %err, "scroll to top failed");
        }
    }
}

/// Add or remove `class` so that its presence equals `on`.
pub(crate) fn set_flag<D: PageDom>(dom: &mut D, el: &D::Handle, class: &str, on: bool) {
    let result = if on {
        dom.add_class(el, class)
    } else {
        dom.remove_class(el, class)
    };
    if let Err(err) = result {
        warn!(error = %err, class, "could not update class");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{ElementSpec, HeadlessDom};

    #[test]
    fn thresholds_are_strict() {
        let mut dom = HeadlessDom::new();
        let body = dom.body();
        let navbar = dom.insert(body, ElementSpec::new("nav").id("navbar"));
        let button = dom.insert(body, ElementSpec::new("button").id("scroll-top"));
        let chrome = ScrollChrome::bind(&dom, &ScrollConfig::default());

        chrome.on_scroll(&mut dom, 50.0);
        assert!(!dom.has_class(&navbar, SCROLLED_CLASS));
        chrome.on_scroll(&mut dom, 51.0);
        assert!(dom.has_class(&navbar, SCROLLED_CLASS));
        assert!(!dom.has_class(&button, VISIBLE_CLASS));

        chrome.on_scroll(&mut dom, 301.0);
        assert!(dom.has_class(&button, VISIBLE_CLASS));

        chrome.on_scroll(&mut dom, 0.0);
        assert!(!dom.has_class(&navbar, SCROLLED_CLASS));
        assert!(!dom.has_class(&button, VISIBLE_CLASS));
    }

    #[test]
    fn click_scrolls_to_top() {
        let mut dom = HeadlessDom::new();
        let chrome = ScrollChrome::bind(&dom, &ScrollConfig::default());
        chrome.on_scroll_top_click(&mut dom);
        assert_eq!(dom.scroll_to_top_count(), 1);
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut dom = HeadlessDom::new();
        let chrome = ScrollChrome::bind(&dom, &ScrollConfig::default());
        chrome.on_scroll(&mut dom, 1000.0);
        assert!(chrome.scroll_top_button().is_none());
    }
}
