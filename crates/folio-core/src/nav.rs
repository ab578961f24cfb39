#![forbid(unsafe_code)]

//! Smooth-scroll navigation and active-section highlighting.
//!
//! # Invariants
//!
//! 1. After any scroll update exactly the links whose `href` targets the
//!    current section carry `active`. Duplicate links (desktop and mobile
//!    menus, footer nav) light up together.
//! 2. The current section is the *last* section in document order whose top,
//!    minus the lead, is at or above the scroll position.

use std::fmt;

use tracing::{debug, warn};

use crate::dom::PageDom;
use crate::menu::MobileMenu;

pub const ACTIVE_CLASS: &str = "active";

/// Navigation links and the sections they point at.
#[derive(Debug, Clone)]
pub struct Navigation<H> {
    links: Vec<H>,
    sections: Vec<H>,
    lead: f64,
    first_link_fallback: bool,
}

impl<H: Clone + PartialEq + fmt::Debug> Navigation<H> {
    /// Bind to every `.nav-link` and every `section`.
    pub fn bind<D: PageDom<Handle = H>>(dom: &D, lead: f64, first_link_fallback: bool) -> Self {
        let links = dom.query_all(".nav-link");
        let sections = dom.query_all("section");
        debug!(links = links.len(), sections = sections.len(), "navigation bound");
        Self {
            links,
            sections,
            lead,
            first_link_fallback,
        }
    }

    #[must_use]
    pub fn links(&self) -> &[H] {
        &self.links
    }

    /// Id of the current section for `scroll_y`, if any.
    #[must_use]
    pub fn current_section<D: PageDom<Handle = H>>(&self, dom: &D, scroll_y: f64) -> Option<String> {
        self.sections
            .iter()
            .rev()
            .find(|section| scroll_y >= dom.offset_top(section) - self.lead)
            .and_then(|section| dom.attribute(section, "id"))
    }

    /// Link activation: smooth-scroll to the `href` target and close the
    /// mobile menu if it is open. Returns whether a target was found.
    pub fn on_link_click<D: PageDom<Handle = H>>(
        &self,
        dom: &mut D,
        link: &H,
        menu: &MobileMenu<H>,
    ) -> bool {
        let Some(href) = dom.attribute(link, "href") else {
            return false;
        };
        let Some(target) = href.strip_prefix('#').and_then(|id| dom.by_id(id)) else {
            debug!(href = %href, "navigation target not found");
            return false;
        };
        if let Err(err) = dom.scroll_into_view(&target) {
            warn!(error = %err, href = %href, "smooth scroll failed");
        }
        if menu.is_open(dom) {
            menu.close(dom);
        }
        true
    }

    /// Scroll update: mark every link for the current section active.
    pub fn on_scroll<D: PageDom<Handle = H>>(&self, dom: &mut D, scroll_y: f64) {
        let current = self.current_section(dom, scroll_y);
        let wanted = current.map(|id| format!("#{id}"));
        let mut marked = false;
        for link in &self.links {
            let is_current =
                wanted.is_some() && dom.attribute(link, "href").as_deref() == wanted.as_deref();
            marked |= is_current;
            self.mark(dom, link, is_current);
        }
        if !marked && wanted.is_none() && self.first_link_fallback {
            if let Some(first) = self.links.first() {
                self.mark(dom, first, true);
            }
        }
    }

    fn mark<D: PageDom<Handle = H>>(&self, dom: &mut D, link: &H, active: bool) {
        let result = if active {
            dom.add_class(link, ACTIVE_CLASS)
        } else {
            dom.remove_class(link, ACTIVE_CLASS)
        };
        if let Err(err) = result {
            warn!(error = %err, "could not update nav link");
        }
    }
}
