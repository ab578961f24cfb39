#![forbid(unsafe_code)]

//! [`PageDom`] over the browser document.

use folio_core::dom::{DomError, DomResult, PageDom, Rect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Node, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollToOptions, Window,
};

pub(crate) fn js_error(err: JsValue) -> DomError {
    DomError::Host(
        err.as_string()
            .or_else(|| {
                err.dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{err:?}")),
    )
}

/// Live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// Bind to the global `window.document`.
    pub fn from_global() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::Unsupported("no global window"))?;
        let document = window
            .document()
            .ok_or(DomError::Unsupported("window has no document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current vertical scroll offset; zero when the host refuses to report it.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn html(el: &Element) -> DomResult<&HtmlElement> {
        el.dyn_ref::<HtmlElement>()
            .ok_or(DomError::Unsupported("inline style on non-HTML element"))
    }
}

impl PageDom for WebDom {
    type Handle = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_in(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&mut self, el: &Element, name: &str, value: &str) -> DomResult<()> {
        el.set_attribute(name, value).map_err(js_error)
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn add_class(&mut self, el: &Element, class: &str) -> DomResult<()> {
        el.class_list().add_1(class).map_err(js_error)
    }

    fn remove_class(&mut self, el: &Element, class: &str) -> DomResult<()> {
        el.class_list().remove_1(class).map_err(js_error)
    }

    fn toggle_class(&mut self, el: &Element, class: &str) -> DomResult<bool> {
        el.class_list().toggle(class).map_err(js_error)
    }

    fn style(&self, el: &Element, property: &str) -> Option<String> {
        let value = Self::html(el)
            .ok()?
            .style()
            .get_property_value(property)
            .ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_style(&mut self, el: &Element, property: &str, value: &str) -> DomResult<()> {
        Self::html(el)?
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn text(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, el: &Element, text: &str) -> DomResult<()> {
        el.set_text_content(Some(text));
        Ok(())
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn offset_top(&self, el: &Element) -> f64 {
        el.dyn_ref::<HtmlElement>()
            .map_or(0.0, |html| f64::from(html.offset_top()))
    }

    fn bounding_rect(&self, el: &Element) -> Rect {
        let r = el.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn scroll_into_view(&mut self, el: &Element) -> DomResult<()> {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        el.scroll_into_view_with_scroll_into_view_options(&options);
        Ok(())
    }

    fn scroll_to_top(&mut self) -> DomResult<()> {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }

    fn value(&self, el: &Element) -> Option<String> {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            return Some(area.value());
        }
        el.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
    }

    fn reset_form(&mut self, form: &Element) -> DomResult<()> {
        form.dyn_ref::<HtmlFormElement>()
            .ok_or(DomError::Unsupported("reset on non-form element"))?
            .reset();
        Ok(())
    }

    fn alert(&mut self, message: &str) -> DomResult<()> {
        self.window.alert_with_message(message).map_err(js_error)
    }

    fn supports_native_lazy_loading(&self) -> bool {
        let global = js_sys::global();
        js_sys::Reflect::get(&global, &JsValue::from_str("HTMLImageElement"))
            .and_then(|ctor| js_sys::Reflect::get(&ctor, &JsValue::from_str("prototype")))
            .and_then(|proto| js_sys::Reflect::has(&proto, &JsValue::from_str("loading")))
            .unwrap_or(false)
    }

    fn append_script(&mut self, src: &str) -> DomResult<()> {
        let body = self
            .document
            .body()
            .ok_or(DomError::Unsupported("document has no body"))?;
        let script = self.document.create_element("script").map_err(js_error)?;
        script.set_attribute("src", src).map_err(js_error)?;
        body.append_child(&script).map_err(js_error)?;
        Ok(())
    }
}
