#![forbid(unsafe_code)]

//! The page controller: binds every feature once and routes host events.
//!
//! # Lifecycle
//!
//! 1. [`PageController::new`] looks up every element the features need.
//!    Missing elements disable only the feature that needs them.
//! 2. [`PageController::start`] applies the saved theme, hides reveal
//!    targets, resolves lazy images and stamps the footer year. The returned
//!    [`StartReport`] tells the host what to observe.
//! 3. The host forwards DOM events as [`PageEvent`]s to
//!    [`PageController::handle`] and applies the returned [`EventOutcome`].
//!
//! Handlers run to completion and never panic on page shape.

use tracing::{debug, info, warn};

use crate::config::PageConfig;
use crate::contact::{ContactForm, ContactSink, LogOnlySink, Submission};
use crate::dom::{IntersectionEntry, PageDom};
use crate::filter::ProjectFilter;
use crate::github;
use crate::lazy::{LazyOutcome, load_lazy_images};
use crate::menu::MobileMenu;
use crate::nav::Navigation;
use crate::parallax::HeroParallax;
use crate::reveal::{RevealAnimator, SkillBars};
use crate::scroll::ScrollChrome;
use crate::storage::PreferenceStore;
use crate::theme::{Theme, ThemeToggle};
use crate::tilt::CardTilt;
use crate::typewriter::Typewriter;
use crate::year::stamp_current_year;

/// Which intersection observer produced a batch of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverKind {
    /// Content blocks (threshold `reveal.threshold`, root margin `reveal.root_margin`).
    Reveal,
    /// The `#skills` section (threshold `reveal.skills_threshold`).
    Skills,
}

/// Host events the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<H> {
    Scroll { scroll_y: f64, viewport_height: f64 },
    NavLinkClick(H),
    HamburgerClick,
    /// Any click on the document, with the element it landed on.
    DocumentClick(H),
    ThemeToggleClick,
    FilterClick(H),
    ScrollTopClick,
    ContactSubmit,
    Intersection {
        observer: ObserverKind,
        entries: Vec<IntersectionEntry<H>>,
    },
    CardPointerMove { card: H, client_x: f64, client_y: f64 },
    CardPointerLeave(H),
    TypewriterTick,
}

/// What the host must do after a handler ran.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome<H> {
    /// Suppress the browser's default action (navigation, form post).
    pub prevent_default: bool,
    /// Targets the originating observer should stop watching.
    pub unobserve: Vec<H>,
    /// The typewriter timer can be cancelled.
    pub timer_done: bool,
}

impl<H> Default for EventOutcome<H> {
    fn default() -> Self {
        Self {
            prevent_default: false,
            unobserve: Vec::new(),
            timer_done: false,
        }
    }
}

impl<H> EventOutcome<H> {
    fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            ..Self::default()
        }
    }

    fn unobserve(targets: Vec<H>) -> Self {
        Self {
            unobserve: targets,
            ..Self::default()
        }
    }

    /// Whether a timer tick ended its timer. `None` is a tick the host could
    /// not deliver (controller busy); the timer keeps running.
    #[must_use]
    pub fn timer_finished(outcome: Option<&Self>) -> bool {
        outcome.is_some_and(|o| o.timer_done)
    }
}

/// Result of [`PageController::start`].
#[derive(Debug, Clone, PartialEq)]
pub struct StartReport<H> {
    pub theme: Theme,
    /// Observe with the reveal observer.
    pub reveal_targets: Vec<H>,
    /// Observe with the skills observer.
    pub skills_section: Option<H>,
    pub lazy_images: LazyOutcome,
    pub years_stamped: usize,
    /// Typewriter tick interval, when the effect started.
    pub typewriter_interval_ms: Option<u32>,
    /// Profile URL to fetch, when enabled.
    pub github_profile_url: Option<String>,
}

/// Elements the host attaches listeners to.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerTargets<H> {
    pub nav_links: Vec<H>,
    pub hamburger: Option<H>,
    pub theme_toggle: Option<H>,
    pub filter_buttons: Vec<H>,
    pub project_cards: Vec<H>,
    pub scroll_top: Option<H>,
    pub contact_form: Option<H>,
}

/// Single owner of page behavior, constructed once per document.
pub struct PageController<D: PageDom, S, C = LogOnlySink> {
    dom: D,
    store: S,
    sink: C,
    config: PageConfig,
    nav: Navigation<D::Handle>,
    menu: MobileMenu<D::Handle>,
    theme: ThemeToggle<D::Handle>,
    filter: ProjectFilter<D::Handle>,
    chrome: ScrollChrome<D::Handle>,
    parallax: HeroParallax<D::Handle>,
    contact: ContactForm<D::Handle>,
    reveal: RevealAnimator<D::Handle>,
    skills: SkillBars<D::Handle>,
    tilt: CardTilt,
    typewriter: Option<(D::Handle, Typewriter)>,
}

impl<D: PageDom, S: PreferenceStore> PageController<D, S, LogOnlySink> {
    /// Controller with the log-only contact sink.
    pub fn new(dom: D, store: S, config: PageConfig) -> Self {
        Self::with_sink(dom, store, LogOnlySink, config)
    }
}

impl<D, S, C> PageController<D, S, C>
where
    D: PageDom,
    S: PreferenceStore,
    C: ContactSink,
{
    pub fn with_sink(dom: D, store: S, sink: C, config: PageConfig) -> Self {
        let nav = Navigation::bind(&dom, config.scroll.section_lead, config.scroll.first_link_fallback);
        let menu = MobileMenu::bind(&dom);
        let theme = ThemeToggle::bind(&dom, &config.theme_storage_key);
        let filter = ProjectFilter::bind(&dom, &config.filter);
        let chrome = ScrollChrome::bind(&dom, &config.scroll);
        let parallax = HeroParallax::bind(&dom, &config.parallax);
        let contact = ContactForm::bind(&dom);
        let reveal = RevealAnimator::bind(&dom, &config.reveal);
        let skills = SkillBars::bind(&dom);
        let tilt = CardTilt::new(config.tilt_divisor);
        Self {
            dom,
            store,
            sink,
            config,
            nav,
            menu,
            theme,
            filter,
            chrome,
            parallax,
            contact,
            reveal,
            skills,
            tilt,
            typewriter: None,
        }
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    /// Tear down, handing back the document and store (e.g. to simulate a reload).
    pub fn into_parts(self) -> (D, S) {
        (self.dom, self.store)
    }

    #[must_use]
    pub fn listener_targets(&self) -> ListenerTargets<D::Handle> {
        ListenerTargets {
            nav_links: self.nav.links().to_vec(),
            hamburger: self.menu.hamburger().cloned(),
            theme_toggle: self.theme.button().cloned(),
            filter_buttons: self.filter.buttons().to_vec(),
            project_cards: self.filter.cards().to_vec(),
            scroll_top: self.chrome.scroll_top_button().cloned(),
            contact_form: self.contact.form().cloned(),
        }
    }

    /// One-time page initialization. `year` is the current calendar year.
    pub fn start(&mut self, year: i32) -> StartReport<D::Handle> {
        let theme = self.theme.load(&mut self.dom, &mut self.store);
        self.reveal.prepare(&mut self.dom);
        let lazy_images = load_lazy_images(&mut self.dom, &self.config.lazy_polyfill_url);
        let years_stamped = stamp_current_year(&mut self.dom, year);
        let typewriter_interval_ms = self.start_typewriter();
        let github_profile_url = self
            .config
            .github
            .enabled
            .then(|| github::profile_url(&self.config.github));

        if self.config.greeting {
            info!("👋 Hi there!");
            info!(
                "Interested in the code? Check out my GitHub: {}",
                github::profile_page(&self.config.github)
            );
            info!("Let's build something amazing together!");
        }

        debug!(theme = %theme, years_stamped, lazy = ?lazy_images, "page started");
        StartReport {
            theme,
            reveal_targets: self.reveal.targets(),
            skills_section: self.skills.section().cloned(),
            lazy_images,
            years_stamped,
            typewriter_interval_ms,
            github_profile_url,
        }
    }

    fn start_typewriter(&mut self) -> Option<u32> {
        if !self.config.typewriter.enabled {
            return None;
        }
        if let Some((tagline, typewriter)) = &mut self.typewriter {
            // Restarted mid-animation: the tagline holds a partial string.
            typewriter.reset();
            if let Err(err) = self.dom.set_text(tagline, "") {
                warn!(error = %err, "could not clear tagline");
                self.typewriter = None;
                return None;
            }
            return Some(self.config.typewriter.interval_ms);
        }
        let Some(tagline) = self.dom.query_all(".hero-tagline").into_iter().next() else {
            debug!("typewriter enabled but no .hero-tagline");
            return None;
        };
        let text = self.dom.text(&tagline);
        if let Err(err) = self.dom.set_text(&tagline, "") {
            warn!(error = %err, "could not clear tagline");
            return None;
        }
        self.typewriter = Some((tagline, Typewriter::new(&text)));
        Some(self.config.typewriter.interval_ms)
    }

    /// Route one host event.
    pub fn handle(&mut self, event: PageEvent<D::Handle>) -> EventOutcome<D::Handle> {
        match event {
            PageEvent::Scroll {
                scroll_y,
                viewport_height,
            } => {
                self.nav.on_scroll(&mut self.dom, scroll_y);
                self.chrome.on_scroll(&mut self.dom, scroll_y);
                if self.config.parallax.enabled {
                    self.parallax.on_scroll(&mut self.dom, scroll_y, viewport_height);
                }
                EventOutcome::default()
            }
            PageEvent::NavLinkClick(link) => {
                self.nav.on_link_click(&mut self.dom, &link, &self.menu);
                EventOutcome::prevent_default()
            }
            PageEvent::HamburgerClick => {
                self.menu.toggle(&mut self.dom);
                EventOutcome::default()
            }
            PageEvent::DocumentClick(target) => {
                self.menu.on_document_click(&mut self.dom, &target);
                EventOutcome::default()
            }
            PageEvent::ThemeToggleClick => {
                let theme = self.theme.toggle(&mut self.dom, &mut self.store);
                debug!(theme = %theme, "theme toggled");
                EventOutcome::default()
            }
            PageEvent::FilterClick(button) => {
                self.filter.on_click(&mut self.dom, &button);
                EventOutcome::default()
            }
            PageEvent::ScrollTopClick => {
                self.chrome.on_scroll_top_click(&mut self.dom);
                EventOutcome::default()
            }
            PageEvent::ContactSubmit => {
                match self.contact.on_submit(&mut self.dom, &mut self.sink) {
                    Submission::Sent(_) | Submission::Failed(_) => {}
                    Submission::NoForm => debug!("submit without a contact form"),
                }
                EventOutcome::prevent_default()
            }
            PageEvent::Intersection { observer, entries } => {
                let done = match observer {
                    ObserverKind::Reveal => self.reveal.on_entries(&mut self.dom, &entries),
                    ObserverKind::Skills => self.skills.on_entries(&mut self.dom, &entries),
                };
                EventOutcome::unobserve(done)
            }
            PageEvent::CardPointerMove {
                card,
                client_x,
                client_y,
            } => {
                self.tilt.on_pointer_move(&mut self.dom, &card, client_x, client_y);
                EventOutcome::default()
            }
            PageEvent::CardPointerLeave(card) => {
                self.tilt.on_pointer_leave(&mut self.dom, &card);
                EventOutcome::default()
            }
            PageEvent::TypewriterTick => EventOutcome {
                timer_done: self.tick_typewriter(),
                ..EventOutcome::default()
            },
        }
    }

    /// Advance the typewriter; returns `true` once it has finished.
    fn tick_typewriter(&mut self) -> bool {
        let Some((tagline, typewriter)) = &mut self.typewriter else {
            return true;
        };
        match typewriter.step() {
            Some(visible) => {
                if let Err(err) = self.dom.set_text(tagline, &visible) {
                    warn!(error = %err, "typewriter update failed");
                    self.typewriter = None;
                    return true;
                }
                let finished = typewriter.is_done();
                if finished {
                    self.typewriter = None;
                }
                finished
            }
            None => {
                self.typewriter = None;
                true
            }
        }
    }
}
