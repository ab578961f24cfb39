#![forbid(unsafe_code)]

//! Footer year stamp.

use tracing::warn;

use crate::dom::PageDom;

/// Write `year` into every `.current-year` element. Returns how many were stamped.
pub fn stamp_current_year<D: PageDom>(dom: &mut D, year: i32) -> usize {
    let text = year.to_string();
    dom.query_all(".current-year")
        .into_iter()
        .filter(|el| match dom.set_text(el, &text) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "could not stamp year");
                false
            }
        })
        .count()
}
