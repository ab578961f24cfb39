#![forbid(unsafe_code)]

//! Project card filtering.
//!
//! # Invariants
//!
//! 1. After any click exactly one filter button carries `active`.
//! 2. `all` shows every card. Any other value shows a card iff its
//!    `data-category` matches under the configured [`CategoryMatch`].
//! 3. Shown cards get the entrance animation on every click, even if they
//!    were already visible.

use std::fmt;

use tracing::{debug, warn};

use crate::config::{CategoryMatch, FilterConfig};
use crate::dom::PageDom;
use crate::scroll::set_flag;

pub const ACTIVE_CLASS: &str = "active";
pub const WILDCARD: &str = "all";

impl CategoryMatch {
    /// Whether a card with `category` is shown under `filter`.
    #[must_use]
    pub fn matches(self, category: Option<&str>, filter: &str) -> bool {
        if filter == WILDCARD {
            return true;
        }
        let Some(category) = category else {
            return false;
        };
        match self {
            Self::Substring => category.contains(filter),
            Self::Token => category
                .split(|c: char| c.is_whitespace() || c == ',')
                .any(|token| token == filter),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectFilter<H> {
    buttons: Vec<H>,
    cards: Vec<H>,
    policy: CategoryMatch,
    animation: String,
}

impl<H: Clone + PartialEq + fmt::Debug> ProjectFilter<H> {
    /// Bind to `.filter-btn` and `.project-card`.
    pub fn bind<D: PageDom<Handle = H>>(dom: &D, config: &FilterConfig) -> Self {
        Self {
            buttons: dom.query_all(".filter-btn"),
            cards: dom.query_all(".project-card"),
            policy: config.match_policy,
            animation: config.entrance_animation.clone(),
        }
    }

    #[must_use]
    pub fn buttons(&self) -> &[H] {
        &self.buttons
    }

    #[must_use]
    pub fn cards(&self) -> &[H] {
        &self.cards
    }

    /// Filter button click. Returns the number of cards shown.
    pub fn on_click<D: PageDom<Handle = H>>(&self, dom: &mut D, button: &H) -> usize {
        for other in &self.buttons {
            set_flag(dom, other, ACTIVE_CLASS, other == button);
        }
        if !self.buttons.contains(button) {
            set_flag(dom, button, ACTIVE_CLASS, true);
        }

        let Some(filter) = dom.attribute(button, "data-filter") else {
            debug!("filter button without data-filter");
            return self.cards.iter().filter(|c| is_shown(dom, c)).count();
        };

        let mut shown = 0;
        for card in &self.cards {
            let category = dom.attribute(card, "data-category");
            let result = if self.policy.matches(category.as_deref(), &filter) {
                shown += 1;
                dom.set_style(card, "display", "block")
                    .and_then(|()| dom.set_style(card, "animation", &self.animation))
            } else {
                dom.set_style(card, "display", "none")
            };
            if let Err(err) = result {
                warn!(error = %err, "could not update project card");
            }
        }
        debug!(filter = %filter, shown, total = self.cards.len(), "projects filtered");
        shown
    }
}

fn is_shown<D: PageDom>(dom: &D, card: &D::Handle) -> bool {
    dom.style(card, "display").as_deref() != Some("none")
}
