#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use folio_core::github::{self, GithubProfile};
use folio_core::{
    EventOutcome, IntersectionEntry, LogOnlySink, ObserverKind, PageConfig, PageController,
    PageDom, PageEvent,
};
use js_sys::{Array, Date};
use tracing::{Level, debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, Node, Response, Window,
};

use crate::console;
use crate::dom::WebDom;
use crate::storage::LocalStore;

/// Id of the optional inline JSON configuration block.
const CONFIG_ELEMENT_ID: &str = "folio-config";

type WebController = PageController<WebDom, LocalStore, LogOnlySink>;
type Shared = Rc<RefCell<WebController>>;

/// Registered DOM listener; removed from its target on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Intersection observer plus its callback; disconnected on drop.
struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Repeating timer; cleared on drop if still running.
struct Interval {
    window: Window,
    handle: Rc<Cell<Option<i32>>>,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_interval_with_handle(handle);
        }
    }
}

/// Failure of the optional profile request.
#[derive(Debug)]
enum FetchError {
    Network(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Decode(msg) => write!(f, "could not decode profile: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

async fn fetch_profile(window: Window, url: String) -> Result<GithubProfile, FetchError> {
    let network = |e: JsValue| FetchError::Network(js_message(&e));
    let response: Response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .ok_or_else(|| FetchError::Decode("body is not text".into()))?;
    github::parse_profile(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

fn load_config(dom: &WebDom) -> PageConfig {
    let Some(text) = dom.by_id(CONFIG_ELEMENT_ID).map(|el| dom.text(&el)) else {
        return PageConfig::default();
    };
    match PageConfig::from_json(&text) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "ignoring #{CONFIG_ELEMENT_ID}; using defaults");
            PageConfig::default()
        }
    }
}

/// Element an event landed on (text nodes resolve to their parent).
fn event_element(event: &Event) -> Option<Element> {
    let node = event.target()?.dyn_into::<Node>().ok()?;
    match node.dyn_into::<Element>() {
        Ok(el) => Some(el),
        Err(node) => node.parent_element(),
    }
}

fn dispatch(controller: &Shared, event: PageEvent<Element>) -> Option<EventOutcome<Element>> {
    match controller.try_borrow_mut() {
        Ok(mut c) => Some(c.handle(event)),
        Err(_) => {
            warn!("page controller busy; event dropped");
            None
        }
    }
}

/// Browser host for the portfolio page controller.
///
/// Keep the returned object alive for as long as the page should stay
/// interactive; dropping it (or calling `destroy`) removes every listener,
/// observer and timer.
#[wasm_bindgen]
pub struct FolioWeb {
    controller: Shared,
    window: Window,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
    typewriter: Option<Interval>,
    started: bool,
}

#[wasm_bindgen]
impl FolioWeb {
    /// Bind to the current document. Reads `#folio-config` if present.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FolioWeb, JsValue> {
        console::init(Level::INFO);
        let dom = WebDom::from_global().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let window = dom.window().clone();
        let store = LocalStore::from_window(&window);
        let config = load_config(&dom);
        let controller = PageController::new(dom, store, config);
        Ok(Self {
            controller: Rc::new(RefCell::new(controller)),
            window,
            listeners: Vec::new(),
            observers: Vec::new(),
            typewriter: None,
            started: false,
        })
    }

    /// Apply initial state and attach every listener. Idempotent.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        let year = i32::try_from(Date::new_0().get_full_year()).unwrap_or_default();
        let report = self.controller.borrow_mut().start(year);
        self.attach_listeners()?;

        let reveal = self.controller.borrow().config().reveal.clone();
        self.observe(
            ObserverKind::Reveal,
            &report.reveal_targets,
            reveal.threshold,
            Some(&reveal.root_margin),
        )?;
        if let Some(section) = &report.skills_section {
            self.observe(
                ObserverKind::Skills,
                std::slice::from_ref(section),
                reveal.skills_threshold,
                None,
            )?;
        }
        if let Some(interval_ms) = report.typewriter_interval_ms {
            self.start_typewriter(interval_ms)?;
        }
        if let Some(url) = report.github_profile_url {
            let window = self.window.clone();
            spawn_local(async move {
                match fetch_profile(window, url).await {
                    Ok(profile) => info!(?profile, "GitHub stats"),
                    Err(err) => warn!(error = %err, "error fetching GitHub stats"),
                }
            });
        }
        self.started = true;
        debug!(
            listeners = self.listeners.len(),
            observers = self.observers.len(),
            "folio started"
        );
        Ok(())
    }

    /// Theme currently applied (`"light"` or `"dark"`).
    #[wasm_bindgen(js_name = currentTheme)]
    pub fn current_theme(&self) -> String {
        self.controller.borrow().theme().as_str().to_string()
    }

    /// Detach everything. The object can be started again afterwards.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.observers.clear();
        self.typewriter = None;
        self.started = false;
    }
}

impl FolioWeb {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        self.listeners.push(Listener::attach(target, kind, handler)?);
        Ok(())
    }

    /// Listener that forwards `make(event)` and honours `prevent_default`.
    fn forward(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        make: impl Fn(&Event) -> Option<PageEvent<Element>> + 'static,
    ) -> Result<(), JsValue> {
        let controller = Rc::clone(&self.controller);
        self.listen(target, kind, move |event| {
            let Some(page_event) = make(&event) else {
                return;
            };
            if dispatch(&controller, page_event).is_some_and(|o| o.prevent_default) {
                event.prevent_default();
            }
        })
    }

    fn attach_listeners(&mut self) -> Result<(), JsValue> {
        let targets = self.controller.borrow().listener_targets();
        let window: EventTarget = self.window.clone().into();

        let scroll_dom = self.controller.borrow().dom().clone();
        self.forward(&window, "scroll", move |_| {
            Some(PageEvent::Scroll {
                scroll_y: scroll_dom.scroll_y(),
                viewport_height: scroll_dom.viewport_height(),
            })
        })?;

        for link in &targets.nav_links {
            let link_el = link.clone();
            self.forward(link, "click", move |_| {
                Some(PageEvent::NavLinkClick(link_el.clone()))
            })?;
        }
        if let Some(hamburger) = &targets.hamburger {
            self.forward(hamburger, "click", |_| Some(PageEvent::HamburgerClick))?;
        }
        let document: EventTarget = self.controller.borrow().dom().document().clone().into();
        self.forward(&document, "click", |event| {
            event_element(event).map(PageEvent::DocumentClick)
        })?;
        if let Some(toggle) = &targets.theme_toggle {
            self.forward(toggle, "click", |_| Some(PageEvent::ThemeToggleClick))?;
        }
        for button in &targets.filter_buttons {
            let button_el = button.clone();
            self.forward(button, "click", move |_| {
                Some(PageEvent::FilterClick(button_el.clone()))
            })?;
        }
        if let Some(scroll_top) = &targets.scroll_top {
            self.forward(scroll_top, "click", |_| Some(PageEvent::ScrollTopClick))?;
        }
        if let Some(form) = &targets.contact_form {
            self.forward(form, "submit", |_| Some(PageEvent::ContactSubmit))?;
        }
        for card in &targets.project_cards {
            let move_card = card.clone();
            self.forward(card, "mousemove", move |event| {
                let mouse = event.dyn_ref::<MouseEvent>()?;
                Some(PageEvent::CardPointerMove {
                    card: move_card.clone(),
                    client_x: f64::from(mouse.client_x()),
                    client_y: f64::from(mouse.client_y()),
                })
            })?;
            let leave_card = card.clone();
            self.forward(card, "mouseleave", move |_| {
                Some(PageEvent::CardPointerLeave(leave_card.clone()))
            })?;
        }
        Ok(())
    }

    fn observe(
        &mut self,
        kind: ObserverKind,
        targets: &[Element],
        threshold: f64,
        root_margin: Option<&str>,
    ) -> Result<(), JsValue> {
        if targets.is_empty() {
            return Ok(());
        }
        let controller = Rc::clone(&self.controller);
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let entries: Vec<IntersectionEntry<Element>> = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| IntersectionEntry {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                    .collect();
                let event = PageEvent::Intersection {
                    observer: kind,
                    entries,
                };
                if let Some(outcome) = dispatch(&controller, event) {
                    for target in &outcome.unobserve {
                        observer.unobserve(target);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            options.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for target in targets {
            observer.observe(target);
        }
        self.observers.push(Observer {
            observer,
            _callback: callback,
        });
        Ok(())
    }

    fn start_typewriter(&mut self, interval_ms: u32) -> Result<(), JsValue> {
        let controller = Rc::clone(&self.controller);
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick_handle = Rc::clone(&handle);
        let window = self.window.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            let outcome = dispatch(&controller, PageEvent::TypewriterTick);
            if EventOutcome::timer_finished(outcome.as_ref()) {
                if let Some(id) = tick_handle.take() {
                    window.clear_interval_with_handle(id);
                }
            }
        });
        let id = self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            i32::try_from(interval_ms).unwrap_or(i32::MAX),
        )?;
        handle.set(Some(id));
        self.typewriter = Some(Interval {
            window: self.window.clone(),
            handle,
            _callback: callback,
        });
        Ok(())
    }
}

/// Convenience entry point: construct and start in one call.
#[wasm_bindgen]
pub fn mount() -> Result<FolioWeb, JsValue> {
    let mut app = FolioWeb::new()?;
    app.start()?;
    Ok(app)
}
