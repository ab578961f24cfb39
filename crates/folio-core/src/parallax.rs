#![forbid(unsafe_code)]

//! Hero section parallax.

use std::fmt;

use tracing::warn;

use crate::config::ParallaxConfig;
use crate::dom::PageDom;

#[derive(Debug, Clone)]
pub struct HeroParallax<H> {
    content: Option<H>,
    image: Option<H>,
    content_rate: f64,
    image_rate: f64,
}

impl<H: Clone + PartialEq + fmt::Debug> HeroParallax<H> {
    pub fn bind<D: PageDom<Handle = H>>(dom: &D, config: &ParallaxConfig) -> Self {
        let first = |selector: &str| dom.query_all(selector).into_iter().next();
        Self {
            content: first(".hero-content"),
            image: first(".hero-image"),
            content_rate: config.content_rate,
            image_rate: config.image_rate,
        }
    }

    /// Shift the hero layers while the hero is still on screen
    /// (`scroll_y < viewport_height`). Needs both layers.
    pub fn on_scroll<D: PageDom<Handle = H>>(&self, dom: &mut D, scroll_y: f64, viewport_height: f64) {
        let (Some(content), Some(image)) = (&self.content, &self.image) else {
            return;
        };
        if scroll_y >= viewport_height {
            return;
        }
        for (el, rate) in [(content, self.content_rate), (image, self.image_rate)] {
            let value = format!("translateY({}px)", scroll_y * rate);
            if let Err(err) = dom.set_style(el, "transform", &value) {
                warn!(error = %err, "parallax update failed");
            }
        }
    }
}
