#![forbid(unsafe_code)]

//! One-shot reveal animations driven by viewport intersection.
//!
//! The host owns the actual observers; it forwards entries here and stops
//! observing whatever targets a handler returns.
//!
//! # Invariants
//!
//! 1. An element is revealed at most once. Later entries for it are ignored
//!    even if the page reset its styles in between.
//! 2. Re-preparing never hides an element that was already revealed, so the
//!    host may start again without leaving content invisible.
//! 3. Skill bars fill at most once per controller lifetime.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::config::RevealConfig;
use crate::dom::{IntersectionEntry, PageDom};

/// Fade-and-slide-in for content blocks.
#[derive(Debug, Clone)]
pub struct RevealAnimator<H> {
    targets: Vec<H>,
    revealed: Vec<H>,
    offset_px: f64,
    transition: String,
}

impl<H: Clone + PartialEq + fmt::Debug> RevealAnimator<H> {
    pub fn bind<D: PageDom<Handle = H>>(dom: &D, config: &RevealConfig) -> Self {
        Self {
            targets: dom.query_all(&config.selectors),
            revealed: Vec::new(),
            offset_px: config.offset_px,
            transition: config.transition.clone(),
        }
    }

    /// Elements the host should observe: every target not yet revealed.
    #[must_use]
    pub fn targets(&self) -> Vec<H> {
        self.pending().cloned().collect()
    }

    fn pending(&self) -> impl Iterator<Item = &H> {
        self.targets.iter().filter(|el| !self.revealed.contains(el))
    }

    #[must_use]
    pub fn is_revealed(&self, el: &H) -> bool {
        self.revealed.contains(el)
    }

    /// Put every unrevealed target in its hidden starting state.
    pub fn prepare<D: PageDom<Handle = H>>(&self, dom: &mut D) {
        let offset = format!("translateY({}px)", self.offset_px);
        let mut prepared = 0usize;
        for el in self.pending() {
            prepared += 1;
            let result = dom
                .set_style(el, "opacity", "0")
                .and_then(|()| dom.set_style(el, "transform", &offset))
                .and_then(|()| dom.set_style(el, "transition", &self.transition));
            if let Err(err) = result {
                warn!(error = %err, "could not prepare reveal target");
            }
        }
        debug!(
            prepared,
            revealed = self.revealed.len(),
            "reveal targets prepared"
        );
    }

    /// Handle observer entries. Returns the targets to stop observing.
    pub fn on_entries<D: PageDom<Handle = H>>(
        &mut self,
        dom: &mut D,
        entries: &[IntersectionEntry<H>],
    ) -> Vec<H> {
        let mut done = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if self.is_revealed(&entry.target) {
                trace!(element = ?entry.target, "already revealed");
                continue;
            }
            trace!(element = ?entry.target, ratio = entry.ratio, "revealing");
            let result = dom
                .set_style(&entry.target, "opacity", "1")
                .and_then(|()| dom.set_style(&entry.target, "transform", "translateY(0)"));
            if let Err(err) = result {
                warn!(error = %err, "reveal failed");
            }
            self.revealed.push(entry.target.clone());
            done.push(entry.target.clone());
        }
        done
    }
}

/// Parse a `data-percentage` value, clamped to `0..=100`.
#[must_use]
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// Skill progress bars filled when `#skills` comes into view.
#[derive(Debug, Clone)]
pub struct SkillBars<H> {
    section: Option<H>,
    bars: Vec<H>,
    filled: bool,
}

impl<H: Clone + PartialEq + fmt::Debug> SkillBars<H> {
    pub fn bind<D: PageDom<Handle = H>>(dom: &D) -> Self {
        Self {
            section: dom.by_id("skills"),
            bars: dom.query_all(".skill-progress"),
            filled: false,
        }
    }

    /// Element the host should observe, until it has fired.
    #[must_use]
    pub fn section(&self) -> Option<&H> {
        if self.filled {
            None
        } else {
            self.section.as_ref()
        }
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Handle observer entries. Returns the section once, when it fires.
    pub fn on_entries<D: PageDom<Handle = H>>(
        &mut self,
        dom: &mut D,
        entries: &[IntersectionEntry<H>],
    ) -> Vec<H> {
        if self.filled {
            return Vec::new();
        }
        let Some(section) = self.section.clone() else {
            return Vec::new();
        };
        let entered = entries
            .iter()
            .any(|e| e.is_intersecting && e.target == section);
        if !entered {
            return Vec::new();
        }
        self.fill(dom);
        vec![section]
    }

    /// Set every bar's width from its `data-percentage`.
    pub fn fill<D: PageDom<Handle = H>>(&mut self, dom: &mut D) {
        self.filled = true;
        for bar in &self.bars {
            let raw = dom.attribute(bar, "data-percentage").unwrap_or_default();
            let Some(percent) = parse_percentage(&raw) else {
                warn!(value = %raw, "skill bar without a numeric percentage");
                continue;
            };
            if let Err(err) = dom.set_style(bar, "width", &format!("{percent}%")) {
                warn!(error = %err, "could not size skill bar");
            }
        }
        debug!(bars = self.bars.len(), "skill bars filled");
    }
}
