#![forbid(unsafe_code)]

//! 3-D tilt for project cards under the pointer.

use tracing::warn;

use crate::dom::{PageDom, Rect};

pub const RESTING_TRANSFORM: &str = "perspective(1000px) rotateX(0) rotateY(0) scale3d(1, 1, 1)";

/// Rotation in degrees for one pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Rotation for a pointer at client `(client_x, client_y)` over `rect`.
    ///
    /// `rotate_x` grows as the pointer moves down from the center; `rotate_y`
    /// grows as it moves left.
    #[must_use]
    pub fn from_pointer(rect: Rect, client_x: f64, client_y: f64, divisor: f64) -> Self {
        let x = client_x - rect.left;
        let y = client_y - rect.top;
        Self {
            rotate_x: (y - rect.height / 2.0) / divisor,
            rotate_y: (rect.width / 2.0 - x) / divisor,
        }
    }

    #[must_use]
    pub fn transform(self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) scale3d(1.02, 1.02, 1.02)",
            no_negative_zero(self.rotate_x),
            no_negative_zero(self.rotate_y)
        )
    }
}

fn no_negative_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[derive(Debug, Clone)]
pub struct CardTilt {
    divisor: f64,
}

impl CardTilt {
    #[must_use]
    pub fn new(divisor: f64) -> Self {
        Self { divisor }
    }

    pub fn on_pointer_move<D: PageDom>(
        &self,
        dom: &mut D,
        card: &D::Handle,
        client_x: f64,
        client_y: f64,
    ) -> Tilt {
        let tilt = Tilt::from_pointer(dom.bounding_rect(card), client_x, client_y, self.divisor);
        if let Err(err) = dom.set_style(card, "transform", &tilt.transform()) {
            warn!(error = %err, "tilt update failed");
        }
        tilt
    }

    pub fn on_pointer_leave<D: PageDom>(&self, dom: &mut D, card: &D::Handle) {
        if let Err(err) = dom.set_style(card, "transform", RESTING_TRANSFORM) {
            warn!(error = %err, "tilt reset failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{ElementSpec, HeadlessDom};

    #[test]
    fn center_is_flat() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        let tilt = Tilt::from_pointer(rect, 200.0, 100.0, 20.0);
        assert_eq!(tilt, Tilt { rotate_x: 0.0, rotate_y: 0.0 });
        assert_eq!(
            tilt.transform(),
            "perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1.02, 1.02, 1.02)"
        );
    }

    #[test]
    fn corners_tilt_toward_pointer() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        // top-left: pointer above center (negative X), left of center (positive Y)
        let tilt = Tilt::from_pointer(rect, 0.0, 0.0, 20.0);
        assert_eq!(tilt.rotate_x, -2.5);
        assert_eq!(tilt.rotate_y, 5.0);
        let tilt = Tilt::from_pointer(rect, 200.0, 100.0, 20.0);
        assert_eq!(tilt.rotate_x, 2.5);
        assert_eq!(tilt.rotate_y, -5.0);
    }

    #[test]
    fn leave_resets_transform() {
        let mut dom = HeadlessDom::new();
        let body = dom.body();
        let card = dom.insert(
            body,
            ElementSpec::new("div").class("project-card").rect(Rect::new(0.0, 0.0, 200.0, 100.0)),
        );
        let tilt = CardTilt::new(20.0);
        tilt.on_pointer_move(&mut dom, &card, 0.0, 0.0);
        assert_eq!(
            dom.style(&card, "transform").as_deref(),
            Some("perspective(1000px) rotateX(-2.5deg) rotateY(5deg) scale3d(1.02, 1.02, 1.02)")
        );
        tilt.on_pointer_leave(&mut dom, &card);
        assert_eq!(dom.style(&card, "transform").as_deref(), Some(RESTING_TRANSFORM));
    }
}
