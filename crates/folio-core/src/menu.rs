#![forbid(unsafe_code)]

//! Mobile navigation menu (hamburger toggle).

use std::fmt;

use tracing::{trace, warn};

use crate::dom::PageDom;

pub const ACTIVE_CLASS: &str = "active";

/// `#hamburger` and `#nav-menu`, toggled together.
#[derive(Debug, Clone)]
pub struct MobileMenu<H> {
    hamburger: Option<H>,
    menu: Option<H>,
}

impl<H: Clone + PartialEq + fmt::Debug> MobileMenu<H> {
    pub fn bind<D: PageDom<Handle = H>>(dom: &D) -> Self {
        Self {
            hamburger: dom.by_id("hamburger"),
            menu: dom.by_id("nav-menu"),
        }
    }

    #[must_use]
    pub fn hamburger(&self) -> Option<&H> {
        self.hamburger.as_ref()
    }

    fn parts(&self) -> impl Iterator<Item = &H> {
        self.hamburger.iter().chain(self.menu.iter())
    }

    #[must_use]
    pub fn is_open<D: PageDom<Handle = H>>(&self, dom: &D) -> bool {
        self.menu
            .as_ref()
            .is_some_and(|menu| dom.has_class(menu, ACTIVE_CLASS))
    }

    /// Hamburger click: flip both elements.
    pub fn toggle<D: PageDom<Handle = H>>(&self, dom: &mut D) {
        for el in self.parts() {
            if let Err(err) = dom.toggle_class(el, ACTIVE_CLASS) {
                warn!(error = %err, "could not toggle menu");
            }
        }
    }

    pub fn close<D: PageDom<Handle = H>>(&self, dom: &mut D) {
        for el in self.parts() {
            if let Err(err) = dom.remove_class(el, ACTIVE_CLASS) {
                warn!(error = %err, "could not close menu");
            }
        }
    }

    /// Document click: close unless the click landed inside the hamburger or
    /// the menu.
    pub fn on_document_click<D: PageDom<Handle = H>>(&self, dom: &mut D, target: &H) {
        if self.hamburger.is_none() || self.menu.is_none() {
            return;
        }
        let inside = self.parts().any(|el| dom.contains(el, target));
        if !inside {
            trace!("click outside menu");
            self.close(dom);
        }
    }
}
