#![forbid(unsafe_code)]

//! Host document abstraction.
//!
//! Every feature in this crate reads and writes the page exclusively through
//! [`PageDom`]. The browser host implements it over `web-sys`; tests use
//! [`HeadlessDom`](crate::headless::HeadlessDom).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Lookup returns `None` | Element absent from markup | Feature bound to it is skipped |
//! | `DomError::Host` | Host rejected a mutation | Logged by the caller, other features continue |
//! | `DomError::Unsupported` | Operation not available on the node | Logged by the caller |

use std::fmt;

/// Errors reported by a [`PageDom`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The host environment rejected the operation (e.g. a thrown JS exception).
    Host(String),
    /// The operation is not supported for this node.
    Unsupported(&'static str),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(msg) => write!(f, "host error: {msg}"),
            Self::Unsupported(what) => write!(f, "unsupported: {what}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;

/// Axis-aligned client rectangle of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// One intersection observation delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<H> {
    /// Observed element.
    pub target: H,
    /// Whether the element currently crosses the observer threshold.
    pub is_intersecting: bool,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
}

impl<H> IntersectionEntry<H> {
    #[must_use]
    pub fn entering(target: H, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting: true,
            ratio,
        }
    }

    #[must_use]
    pub fn leaving(target: H) -> Self {
        Self {
            target,
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// The page surface the controller drives.
///
/// Lookups are infallible and return `None`/empty when nothing matches.
/// Mutations return [`DomResult`] so a rejected write degrades only the
/// feature performing it.
///
/// Selectors passed by this crate are restricted to simple compound
/// selectors (`tag`, `#id`, `.class`, `[attr]`, `[attr="value"]`) joined by
/// commas.
pub trait PageDom {
    /// Opaque element handle. Equality must mean "same node".
    type Handle: Clone + PartialEq + fmt::Debug;

    /// Element with the given `id` attribute.
    fn by_id(&self, id: &str) -> Option<Self::Handle>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Handle>;

    /// First descendant of `scope` matching `selector`.
    fn query_in(&self, scope: &Self::Handle, selector: &str) -> Option<Self::Handle>;

    /// The document root element (`<html>`).
    fn root(&self) -> Option<Self::Handle>;

    fn attribute(&self, el: &Self::Handle, name: &str) -> Option<String>;

    fn set_attribute(&mut self, el: &Self::Handle, name: &str, value: &str) -> DomResult<()>;

    fn has_class(&self, el: &Self::Handle, class: &str) -> bool;

    fn add_class(&mut self, el: &Self::Handle, class: &str) -> DomResult<()>;

    fn remove_class(&mut self, el: &Self::Handle, class: &str) -> DomResult<()>;

    /// Toggle `class`; returns whether the class is present afterwards.
    fn toggle_class(&mut self, el: &Self::Handle, class: &str) -> DomResult<bool>;

    /// Inline style property, if set.
    fn style(&self, el: &Self::Handle, property: &str) -> Option<String>;

    fn set_style(&mut self, el: &Self::Handle, property: &str, value: &str) -> DomResult<()>;

    fn text(&self, el: &Self::Handle) -> String;

    fn set_text(&mut self, el: &Self::Handle, text: &str) -> DomResult<()>;

    /// Inclusive containment: a node contains itself.
    fn contains(&self, ancestor: &Self::Handle, node: &Self::Handle) -> bool;

    /// Distance from the top of the document to the element's border box.
    fn offset_top(&self, el: &Self::Handle) -> f64;

    fn bounding_rect(&self, el: &Self::Handle) -> Rect;

    /// Smoothly scroll `el` into view, aligned to its top edge.
    fn scroll_into_view(&mut self, el: &Self::Handle) -> DomResult<()>;

    /// Smoothly scroll the window to offset zero.
    fn scroll_to_top(&mut self) -> DomResult<()>;

    /// Current value of a form field; `None` if `el` is not a field.
    fn value(&self, el: &Self::Handle) -> Option<String>;

    /// Restore every field of `form` to its default value.
    fn reset_form(&mut self, form: &Self::Handle) -> DomResult<()>;

    /// Show a blocking acknowledgment to the user.
    fn alert(&mut self, message: &str) -> DomResult<()>;

    /// Whether images honour `loading="lazy"` natively.
    fn supports_native_lazy_loading(&self) -> bool;

    /// Append a `<script src=...>` element to the body.
    fn append_script(&mut self, src: &str) -> DomResult<()>;
}

/// Minimal parsed form of one simple compound selector.
///
/// Shared by hosts that cannot delegate selector matching to a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// `(name, expected value)`; `None` means presence only.
    pub attrs: Vec<(String, Option<String>)>,
}

impl SimpleSelector {
    /// Parse a comma-separated selector list. Unsupported syntax yields
    /// `None` for that list element and it is dropped.
    #[must_use]
    pub fn parse_list(selector: &str) -> Vec<Self> {
        selector
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(Self::parse)
            .collect()
    }

    /// Parse a single compound selector such as `img[loading="lazy"]`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut out = Self::default();
        let mut rest = input.trim();
        if rest.is_empty() || rest.contains(char::is_whitespace) && !rest.contains('[') {
            return None;
        }

        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            out.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = &body[..end];
                    if name.is_empty() {
                        return None;
                    }
                    if first == '#' {
                        out.id = Some(name.to_string());
                    } else {
                        out.classes.push(name.to_string());
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let inner = &rest[1..close];
                    match inner.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim().trim_matches(['"', '\'']);
                            out.attrs
                                .push((name.trim().to_string(), Some(value.to_string())));
                        }
                        None => out.attrs.push((inner.trim().to_string(), None)),
                    }
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(out)
    }
}
