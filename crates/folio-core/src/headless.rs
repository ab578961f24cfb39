#![forbid(unsafe_code)]

//! In-memory document for deterministic tests and native tooling.
//!
//! `HeadlessDom` models just enough of a page for the controller: a node
//! tree with tags, ids, classes, attributes, inline styles, text and form
//! values. Layout is supplied by the test (`offset_top`, `rect`) rather than
//! computed. Side effects that a browser would perform visibly (scrolling,
//! alerts, script injection) are recorded for inspection.

use std::collections::BTreeMap;

use crate::dom::{DomError, DomResult, PageDom, Rect, SimpleSelector};

/// Index of a node inside a [`HeadlessDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Description of an element to insert.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    offset_top: f64,
    rect: Rect,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Mark the element as a form field with an initial (default) value.
    #[must_use]
    pub fn field(mut self, default: &str) -> Self {
        self.value = Some(default.to_string());
        self.attrs.insert("value".to_string(), default.to_string());
        self
    }

    #[must_use]
    pub fn offset_top(mut self, top: f64) -> Self {
        self.offset_top = top;
        self
    }

    #[must_use]
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    spec: ElementSpec,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Host-free [`PageDom`] implementation.
#[derive(Debug, Clone)]
pub struct HeadlessDom {
    nodes: Vec<Node>,
    native_lazy: bool,
    scrolled_into_view: Vec<NodeId>,
    scroll_to_top_count: usize,
    alerts: Vec<String>,
    scripts: Vec<String>,
    rejected_styles: Vec<String>,
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDom {
    /// Create a document with `<html>` and `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            native_lazy: true,
            scrolled_into_view: Vec::new(),
            scroll_to_top_count: 0,
            alerts: Vec::new(),
            scripts: Vec::new(),
            rejected_styles: Vec::new(),
        };
        let html = dom.push(None, ElementSpec::new("html"));
        dom.push(Some(html), ElementSpec::new("body"));
        dom
    }

    #[must_use]
    pub fn html(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        NodeId(1)
    }

    /// Append a new element under `parent`.
    pub fn insert(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        self.push(Some(parent), spec)
    }

    /// Toggle whether [`PageDom::supports_native_lazy_loading`] reports support.
    pub fn set_native_lazy_loading(&mut self, supported: bool) {
        self.native_lazy = supported;
    }

    /// Make every subsequent write to `property` fail, to exercise error paths.
    pub fn reject_style(&mut self, property: &str) {
        self.rejected_styles.push(property.to_string());
    }

    /// Simulate the user typing into a field.
    pub fn set_value(&mut self, el: NodeId, value: &str) {
        self.nodes[el.0].spec.value = Some(value.to_string());
    }

    #[must_use]
    pub fn scrolled_into_view(&self) -> &[NodeId] {
        &self.scrolled_into_view
    }

    #[must_use]
    pub fn scroll_to_top_count(&self) -> usize {
        self.scroll_to_top_count
    }

    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    #[must_use]
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    fn push(&mut self, parent: Option<NodeId>, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            spec,
            style: BTreeMap::new(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Pre-order traversal of the subtree below `scope` (excluding `scope`).
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, id: NodeId, sel: &SimpleSelector) -> bool {
        let spec = &self.node(id).spec;
        if sel.tag.as_deref().is_some_and(|tag| tag != spec.tag) {
            return false;
        }
        if sel.id.is_some() && sel.id != spec.id {
            return false;
        }
        if !sel.classes.iter().all(|c| spec.classes.contains(c)) {
            return false;
        }
        sel.attrs.iter().all(|(name, expected)| {
            let actual = self.read_attribute(id, name);
            match expected {
                Some(expected) => actual.as_deref() == Some(expected.as_str()),
                None => actual.is_some(),
            }
        })
    }

    fn read_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let spec = &self.node(id).spec;
        match name {
            "id" => spec.id.clone(),
            "class" if !spec.classes.is_empty() => Some(spec.classes.join(" ")),
            _ => spec.attrs.get(name).cloned(),
        }
    }

    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let list = SimpleSelector::parse_list(selector);
        self.descendants(scope)
            .into_iter()
            .filter(|id| list.iter().any(|sel| self.matches(*id, sel)))
            .collect()
    }
}

impl PageDom for HeadlessDom {
    type Handle = NodeId;

    fn by_id(&self, id: &str) -> Option<NodeId> {
        let html = self.html();
        std::iter::once(html)
            .chain(self.descendants(html))
            .find(|n| self.node(*n).spec.id.as_deref() == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        if SimpleSelector::parse_list(selector)
            .iter()
            .any(|sel| self.matches(self.html(), sel))
        {
            out.push(self.html());
        }
        out.extend(self.select(self.html(), selector));
        out
    }

    fn query_in(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.select(*scope, selector).into_iter().next()
    }

    fn root(&self) -> Option<NodeId> {
        Some(self.html())
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.read_attribute(*el, name)
    }

    fn set_attribute(&mut self, el: &NodeId, name: &str, value: &str) -> DomResult<()> {
        let spec = &mut self.node_mut(*el).spec;
        match name {
            "id" => spec.id = Some(value.to_string()),
            "class" => spec.classes = value.split_whitespace().map(str::to_string).collect(),
            _ => {
                spec.attrs.insert(name.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.node(*el).spec.classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, el: &NodeId, class: &str) -> DomResult<()> {
        if !self.has_class(el, class) {
            self.node_mut(*el).spec.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, el: &NodeId, class: &str) -> DomResult<()> {
        self.node_mut(*el).spec.classes.retain(|c| c != class);
        Ok(())
    }

    fn toggle_class(&mut self, el: &NodeId, class: &str) -> DomResult<bool> {
        if self.has_class(el, class) {
            self.remove_class(el, class)?;
            Ok(false)
        } else {
            self.add_class(el, class)?;
            Ok(true)
        }
    }

    fn style(&self, el: &NodeId, property: &str) -> Option<String> {
        self.node(*el).style.get(property).cloned()
    }

    fn set_style(&mut self, el: &NodeId, property: &str, value: &str) -> DomResult<()> {
        if self.rejected_styles.iter().any(|p| p == property) {
            return Err(DomError::Host(format!("style property {property} rejected")));
        }
        self.node_mut(*el)
            .style
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn text(&self, el: &NodeId) -> String {
        let mut out = self.node(*el).spec.text.clone();
        for child in self.descendants(*el) {
            out.push_str(&self.node(child).spec.text);
        }
        out
    }

    fn set_text(&mut self, el: &NodeId, text: &str) -> DomResult<()> {
        let detached = std::mem::take(&mut self.node_mut(*el).children);
        for child in detached {
            self.node_mut(child).parent = None;
        }
        self.node_mut(*el).spec.text = text.to_string();
        Ok(())
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut cursor = Some(*node);
        while let Some(id) = cursor {
            if id == *ancestor {
                return true;
            }
            cursor = self.node(id).parent;
        }
        false
    }

    fn offset_top(&self, el: &NodeId) -> f64 {
        self.node(*el).spec.offset_top
    }

    fn bounding_rect(&self, el: &NodeId) -> Rect {
        self.node(*el).spec.rect
    }

    fn scroll_into_view(&mut self, el: &NodeId) -> DomResult<()> {
        self.scrolled_into_view.push(*el);
        Ok(())
    }

    fn scroll_to_top(&mut self) -> DomResult<()> {
        self.scroll_to_top_count += 1;
        Ok(())
    }

    fn value(&self, el: &NodeId) -> Option<String> {
        self.node(*el).spec.value.clone()
    }

    fn reset_form(&mut self, form: &NodeId) -> DomResult<()> {
        if self.node(*form).spec.tag != "form" {
            return Err(DomError::Unsupported("reset on non-form element"));
        }
        for id in self.descendants(*form) {
            let spec = &mut self.node_mut(id).spec;
            if spec.value.is_some() {
                spec.value = Some(spec.attrs.get("value").cloned().unwrap_or_default());
            }
        }
        Ok(())
    }

    fn alert(&mut self, message: &str) -> DomResult<()> {
        self.alerts.push(message.to_string());
        Ok(())
    }

    fn supports_native_lazy_loading(&self) -> bool {
        self.native_lazy
    }

    fn append_script(&mut self, src: &str) -> DomResult<()> {
        let body = self.body();
        self.push(Some(body), ElementSpec::new("script").attr("src", src));
        self.scripts.push(src.to_string());
        Ok(())
    }
}
