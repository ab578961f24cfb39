#![forbid(unsafe_code)]

//! Deferred image loading.

use tracing::{debug, warn};

use crate::dom::PageDom;

pub const LAZY_IMAGE_SELECTOR: &str = r#"img[loading="lazy"]"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyOutcome {
    /// Native support: `src` copied from `data-src` on this many images.
    Native { assigned: usize },
    /// No native support: the polyfill script was appended.
    Polyfill { src: String },
    /// No native support and the polyfill could not be injected.
    Failed,
}

/// Copy `data-src` into `src` where the browser lazy-loads natively;
/// otherwise inject `polyfill_url`.
pub fn load_lazy_images<D: PageDom>(dom: &mut D, polyfill_url: &str) -> LazyOutcome {
    if !dom.supports_native_lazy_loading() {
        return match dom.append_script(polyfill_url) {
            Ok(()) => {
                debug!(src = polyfill_url, "lazy-loading polyfill injected");
                LazyOutcome::Polyfill {
                    src: polyfill_url.to_string(),
                }
            }
            Err(err) => {
                warn!(error = %err, "could not inject lazy-loading polyfill");
                LazyOutcome::Failed
            }
        };
    }

    let mut assigned = 0;
    for img in dom.query_all(LAZY_IMAGE_SELECTOR) {
        let Some(src) = dom.attribute(&img, "data-src") else {
            continue;
        };
        match dom.set_attribute(&img, "src", &src) {
            Ok(()) => assigned += 1,
            Err(err) => warn!(error = %err, "could not assign image source"),
        }
    }
    LazyOutcome::Native { assigned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{ElementSpec, HeadlessDom};

    #[test]
    fn native_copies_data_src() {
        let mut dom = HeadlessDom::new();
        let body = dom.body();
        let img = dom.insert(
            body,
            ElementSpec::new("img").attr("loading", "lazy").attr("data-src", "/a.png"),
        );
        let bare = dom.insert(body, ElementSpec::new("img").attr("loading", "lazy"));
        let eager = dom.insert(body, ElementSpec::new("img").attr("data-src", "/b.png"));

        assert_eq!(load_lazy_images(&mut dom, "poly.js"), LazyOutcome::Native { assigned: 1 });
        assert_eq!(dom.attribute(&img, "src").as_deref(), Some("/a.png"));
        assert_eq!(dom.attribute(&bare, "src"), None);
        assert_eq!(dom.attribute(&eager, "src"), None);
        assert!(dom.scripts().is_empty());
    }

    #[test]
    fn fallback_injects_polyfill() {
        let mut dom = HeadlessDom::new();
        dom.set_native_lazy_loading(false);
        let outcome = load_lazy_images(&mut dom, "https://cdn.example/lazysizes.min.js");
        assert_eq!(
            outcome,
            LazyOutcome::Polyfill {
                src: "https://cdn.example/lazysizes.min.js".into()
            }
        );
        assert_eq!(dom.scripts(), ["https://cdn.example/lazysizes.min.js".to_string()]);
        assert_eq!(dom.query_all("script").len(), 1);
    }
}
