//! End-to-end behavior of the page controller against a headless document.
//!
//! Verifies:
//! 1. Theme toggle is involutive (display and persisted value)
//! 2. Reload preserves the theme
//! 3. Filter `all` shows everything; `design` shows only design cards
//! 4. Scroll 0 vs 400 flips the navbar and scroll-top state
//! 5. Reveal fires at most once per element, and a restart keeps revealed
//!    elements visible
//! 6. Contact submit clears fields and prevents navigation
//! 7. A page missing most elements still runs every handler

use folio_core::contact::SUCCESS_MESSAGE;
use folio_core::theme::THEME_ATTRIBUTE;
use folio_core::{
    ContactError, ContactFields, ElementSpec, EventOutcome, HeadlessDom, IntersectionEntry,
    MemoryStore, NodeId, ObserverKind, PageConfig, PageController, PageDom, PageEvent,
    PreferenceStore, Rect, Theme,
};
use pretty_assertions::assert_eq;

struct Page {
    dom: HeadlessDom,
    navbar: NodeId,
    hamburger: NodeId,
    nav_menu: NodeId,
    nav_links: Vec<NodeId>,
    sections: Vec<NodeId>,
    theme_icon: NodeId,
    filter_buttons: Vec<NodeId>,
    cards: Vec<NodeId>,
    scroll_top: NodeId,
    fields: Vec<NodeId>,
    skills: NodeId,
    skill_bar: NodeId,
    year: NodeId,
}

fn portfolio() -> Page {
    let mut dom = HeadlessDom::new();
    let body = dom.body();

    let navbar = dom.insert(body, ElementSpec::new("nav").id("navbar"));
    let hamburger = dom.insert(navbar, ElementSpec::new("div").id("hamburger"));
    let nav_menu = dom.insert(navbar, ElementSpec::new("ul").id("nav-menu"));
    let toggle = dom.insert(navbar, ElementSpec::new("button").id("theme-toggle"));
    let theme_icon = dom.insert(toggle, ElementSpec::new("i").class("fas").class("fa-moon"));

    let mut nav_links = Vec::new();
    let mut sections = Vec::new();
    for (id, top) in [("home", 0.0), ("skills", 800.0), ("projects", 1600.0), ("contact", 2600.0)] {
        nav_links.push(dom.insert(
            nav_menu,
            ElementSpec::new("a").class("nav-link").attr("href", &format!("#{id}")),
        ));
        sections.push(dom.insert(body, ElementSpec::new("section").id(id).offset_top(top)));
    }
    let skills = sections[1];
    let category = dom.insert(skills, ElementSpec::new("div").class("skill-category"));
    let skill_bar = dom.insert(
        category,
        ElementSpec::new("div").class("skill-progress").attr("data-percentage", "85"),
    );

    let projects = sections[2];
    let filter_buttons = ["all", "web", "design"]
        .iter()
        .map(|f| {
            dom.insert(
                projects,
                ElementSpec::new("button").class("filter-btn").attr("data-filter", f),
            )
        })
        .collect();
    let cards = ["web", "design", "web design", "mobile"]
        .iter()
        .map(|c| {
            dom.insert(
                projects,
                ElementSpec::new("div")
                    .class("project-card")
                    .attr("data-category", c)
                    .rect(Rect::new(0.0, 0.0, 300.0, 200.0)),
            )
        })
        .collect();

    let form = dom.insert(sections[3], ElementSpec::new("form").id("contact-form"));
    let fields = ["name", "email", "subject", "message"]
        .iter()
        .map(|id| dom.insert(form, ElementSpec::new("input").id(id).field("")))
        .collect();

    let scroll_top = dom.insert(body, ElementSpec::new("button").id("scroll-top"));
    let footer = dom.insert(body, ElementSpec::new("footer"));
    let year = dom.insert(footer, ElementSpec::new("span").class("current-year"));

    Page {
        dom,
        navbar,
        hamburger,
        nav_menu,
        nav_links,
        sections,
        theme_icon,
        filter_buttons,
        cards,
        scroll_top,
        fields,
        skills,
        skill_bar,
        year,
    }
}

fn started(page: HeadlessDom, store: MemoryStore) -> PageController<HeadlessDom, MemoryStore> {
    let mut controller = PageController::new(page, store, PageConfig::default());
    controller.start(2026);
    controller
}

fn scroll(y: f64) -> PageEvent<NodeId> {
    PageEvent::Scroll {
        scroll_y: y,
        viewport_height: 900.0,
    }
}

#[test]
fn theme_toggle_is_involutive() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    assert_eq!(c.theme(), Theme::Light);

    c.handle(PageEvent::ThemeToggleClick);
    assert_eq!(c.theme(), Theme::Dark);
    assert!(c.dom().has_class(&p.theme_icon, "fa-sun"));

    c.handle(PageEvent::ThemeToggleClick);
    assert_eq!(c.theme(), Theme::Light);
    assert!(c.dom().has_class(&p.theme_icon, "fa-moon"));
    assert!(!c.dom().has_class(&p.theme_icon, "fa-sun"));
    assert_eq!(c.store().get("theme").unwrap().as_deref(), Some("light"));
    let root = c.dom().html();
    assert_eq!(c.dom().attribute(&root, THEME_ATTRIBUTE).as_deref(), Some("light"));
}

#[test]
fn reload_preserves_dark_theme() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    c.handle(PageEvent::ThemeToggleClick);
    let (_, store) = c.into_parts();

    let reloaded = portfolio();
    let c = started(reloaded.dom, store);
    assert_eq!(c.theme(), Theme::Dark);
    let root = c.dom().html();
    assert_eq!(c.dom().attribute(&root, THEME_ATTRIBUTE).as_deref(), Some("dark"));
    assert!(c.dom().has_class(&reloaded.theme_icon, "fa-sun"));
}

#[test]
fn filters_show_matching_cards() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    let displays = |c: &PageController<HeadlessDom, MemoryStore>| -> Vec<String> {
        p.cards
            .iter()
            .map(|card| c.dom().style(card, "display").unwrap_or_default())
            .collect()
    };

    c.handle(PageEvent::FilterClick(p.filter_buttons[2]));
    assert_eq!(displays(&c), ["none", "block", "block", "none"]);

    c.handle(PageEvent::FilterClick(p.filter_buttons[0]));
    assert_eq!(displays(&c), ["block", "block", "block", "block"]);
    let active: Vec<_> = p
        .filter_buttons
        .iter()
        .filter(|b| c.dom().has_class(b, "active"))
        .collect();
    assert_eq!(active, [&p.filter_buttons[0]]);
}

#[test]
fn scroll_flips_chrome() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());

    c.handle(scroll(0.0));
    assert!(!c.dom().has_class(&p.navbar, "scrolled"));
    assert!(!c.dom().has_class(&p.scroll_top, "visible"));
    assert!(c.dom().has_class(&p.nav_links[0], "active"));

    c.handle(scroll(400.0));
    assert!(c.dom().has_class(&p.navbar, "scrolled"));
    assert!(c.dom().has_class(&p.scroll_top, "visible"));

    c.handle(scroll(650.0));
    assert!(c.dom().has_class(&p.nav_links[1], "active"));
    assert!(!c.dom().has_class(&p.nav_links[0], "active"));
}

#[test]
fn reveal_fires_once_per_element() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    let card = p.cards[0];
    assert_eq!(c.dom().style(&card, "opacity").as_deref(), Some("0"));

    let entering = || PageEvent::Intersection {
        observer: ObserverKind::Reveal,
        entries: vec![IntersectionEntry::entering(card, 0.2)],
    };
    let outcome = c.handle(entering());
    assert_eq!(outcome.unobserve, vec![card]);
    assert_eq!(c.dom().style(&card, "opacity").as_deref(), Some("1"));
    assert_eq!(c.dom().style(&card, "transform").as_deref(), Some("translateY(0)"));

    // Something else hides it again; re-entering must not re-run the reveal.
    c.dom_mut().set_style(&card, "opacity", "0").unwrap();
    c.handle(PageEvent::Intersection {
        observer: ObserverKind::Reveal,
        entries: vec![IntersectionEntry::leaving(card)],
    });
    let outcome = c.handle(entering());
    assert!(outcome.unobserve.is_empty());
    assert_eq!(c.dom().style(&card, "opacity").as_deref(), Some("0"));
}

#[test]
fn skills_observer_fills_bars_once() {
    let p = portfolio();
    let mut c = PageController::new(p.dom, MemoryStore::new(), PageConfig::default());
    let report = c.start(2026);
    assert_eq!(report.skills_section, Some(p.skills));

    let outcome = c.handle(PageEvent::Intersection {
        observer: ObserverKind::Skills,
        entries: vec![IntersectionEntry::entering(p.skills, 0.5)],
    });
    assert_eq!(outcome.unobserve, vec![p.skills]);
    assert_eq!(c.dom().style(&p.skill_bar, "width").as_deref(), Some("85%"));
}

#[test]
fn contact_submit_clears_fields() {
    let p = portfolio();
    let mut dom = p.dom;
    for (field, value) in p.fields.iter().zip(["A", "a@b.com", "S", "M"]) {
        dom.set_value(*field, value);
    }
    let mut c = started(dom, MemoryStore::new());

    let outcome = c.handle(PageEvent::ContactSubmit);
    assert!(outcome.prevent_default);
    for field in &p.fields {
        assert_eq!(c.dom().value(field).as_deref(), Some(""));
    }
    assert_eq!(c.dom().alerts(), [SUCCESS_MESSAGE.to_string()]);
}

#[test]
fn contact_failure_retains_fields() {
    let p = portfolio();
    let mut dom = p.dom;
    dom.set_value(p.fields[0], "A");
    let sink = |_: &ContactFields| -> Result<(), ContactError> {
        Err(ContactError::Rejected("spam".into()))
    };
    let mut c = PageController::with_sink(dom, MemoryStore::new(), sink, PageConfig::default());
    c.start(2026);
    assert!(c.handle(PageEvent::ContactSubmit).prevent_default);
    assert_eq!(c.dom().value(&p.fields[0]).as_deref(), Some("A"));
}

#[test]
fn nav_click_prevents_default_and_closes_menu() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    c.handle(PageEvent::HamburgerClick);
    assert!(c.dom().has_class(&p.nav_menu, "active"));

    let outcome = c.handle(PageEvent::NavLinkClick(p.nav_links[2]));
    assert!(outcome.prevent_default);
    assert_eq!(c.dom().scrolled_into_view(), [p.sections[2]]);
    assert!(!c.dom().has_class(&p.nav_menu, "active"));
    assert!(!c.dom().has_class(&p.hamburger, "active"));
}

#[test]
fn outside_click_closes_menu() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    c.handle(PageEvent::HamburgerClick);
    c.handle(PageEvent::DocumentClick(p.hamburger));
    assert!(c.dom().has_class(&p.nav_menu, "active"));
    c.handle(PageEvent::DocumentClick(p.sections[0]));
    assert!(!c.dom().has_class(&p.nav_menu, "active"));
}

#[test]
fn card_tilt_and_reset() {
    let p = portfolio();
    let mut c = started(p.dom, MemoryStore::new());
    c.handle(PageEvent::CardPointerMove {
        card: p.cards[1],
        client_x: 150.0,
        client_y: 0.0,
    });
    assert_eq!(
        c.dom().style(&p.cards[1], "transform").as_deref(),
        Some("perspective(1000px) rotateX(-5deg) rotateY(0deg) scale3d(1.02, 1.02, 1.02)")
    );
    c.handle(PageEvent::CardPointerLeave(p.cards[1]));
    assert_eq!(
        c.dom().style(&p.cards[1], "transform").as_deref(),
        Some(folio_core::tilt::RESTING_TRANSFORM)
    );
}

#[test]
fn start_stamps_year_and_reports_targets() {
    let p = portfolio();
    let mut c = PageController::new(p.dom, MemoryStore::new(), PageConfig::default());
    let report = c.start(2031);
    assert_eq!(report.years_stamped, 1);
    assert_eq!(c.dom().text(&p.year), "2031");
    // skill-category + four project cards
    assert_eq!(report.reveal_targets.len(), 5);
    assert_eq!(report.typewriter_interval_ms, None);
    assert_eq!(report.github_profile_url, None);

    let targets = c.listener_targets();
    assert_eq!(targets.nav_links, p.nav_links);
    assert_eq!(targets.scroll_top, Some(p.scroll_top));
}

#[test]
fn restart_keeps_revealed_cards_visible() {
    let p = portfolio();
    let mut c = PageController::new(p.dom, MemoryStore::new(), PageConfig::default());
    c.start(2026);
    let card = p.cards[0];
    c.handle(PageEvent::Intersection {
        observer: ObserverKind::Reveal,
        entries: vec![IntersectionEntry::entering(card, 0.3)],
    });
    assert_eq!(c.dom().style(&card, "opacity").as_deref(), Some("1"));

    let report = c.start(2026);
    assert_eq!(c.dom().style(&card, "opacity").as_deref(), Some("1"));
    assert!(!report.reveal_targets.contains(&card));
    assert_eq!(report.reveal_targets.len(), 4);

    let outcome = c.handle(PageEvent::Intersection {
        observer: ObserverKind::Reveal,
        entries: vec![IntersectionEntry::entering(card, 0.8)],
    });
    assert!(outcome.unobserve.is_empty());
    assert_eq!(c.dom().style(&card, "opacity").as_deref(), Some("1"));
}

#[test]
fn typewriter_retypes_tagline() {
    let mut dom = HeadlessDom::new();
    let body = dom.body();
    let tagline = dom.insert(body, ElementSpec::new("p").class("hero-tagline").text("Hey"));
    let mut config = PageConfig::default();
    config.typewriter.enabled = true;
    let mut c = PageController::new(dom, MemoryStore::new(), config);

    let report = c.start(2026);
    assert_eq!(report.typewriter_interval_ms, Some(50));
    assert_eq!(c.dom().text(&tagline), "");

    assert!(!c.handle(PageEvent::TypewriterTick).timer_done);
    assert_eq!(c.dom().text(&tagline), "H");
    assert!(!c.handle(PageEvent::TypewriterTick).timer_done);
    assert!(c.handle(PageEvent::TypewriterTick).timer_done);
    assert_eq!(c.dom().text(&tagline), "Hey");
    assert!(c.handle(PageEvent::TypewriterTick).timer_done);
}

#[test]
fn restart_mid_typewriter_retypes_full_tagline() {
    let mut dom = HeadlessDom::new();
    let body = dom.body();
    let tagline = dom.insert(body, ElementSpec::new("p").class("hero-tagline").text("Hey"));
    let mut config = PageConfig::default();
    config.typewriter.enabled = true;
    let mut c = PageController::new(dom, MemoryStore::new(), config);

    c.start(2026);
    c.handle(PageEvent::TypewriterTick);
    assert_eq!(c.dom().text(&tagline), "H");

    assert_eq!(c.start(2026).typewriter_interval_ms, Some(50));
    assert_eq!(c.dom().text(&tagline), "");
    let frames: Vec<String> = (0..3)
        .map(|_| {
            c.handle(PageEvent::TypewriterTick);
            c.dom().text(&tagline)
        })
        .collect();
    assert_eq!(frames, vec!["H", "He", "Hey"]);
}

#[test]
fn undelivered_tick_keeps_timer_running() {
    assert!(!EventOutcome::<NodeId>::timer_finished(None));
    assert!(!EventOutcome::<NodeId>::timer_finished(Some(&EventOutcome::default())));
    let done = EventOutcome::<NodeId> {
        timer_done: true,
        ..EventOutcome::default()
    };
    assert!(EventOutcome::timer_finished(Some(&done)));
}

#[test]
fn empty_page_survives_every_event() {
    let mut c = started(HeadlessDom::new(), MemoryStore::new());
    let stray = c.dom().body();
    for event in [
        scroll(500.0),
        PageEvent::HamburgerClick,
        PageEvent::DocumentClick(stray),
        PageEvent::ThemeToggleClick,
        PageEvent::FilterClick(stray),
        PageEvent::ScrollTopClick,
        PageEvent::ContactSubmit,
        PageEvent::NavLinkClick(stray),
        PageEvent::TypewriterTick,
        PageEvent::Intersection {
            observer: ObserverKind::Skills,
            entries: vec![IntersectionEntry::entering(stray, 1.0)],
        },
    ] {
        c.handle(event);
    }
    assert_eq!(c.theme(), Theme::Dark);
    assert!(c.dom().alerts().is_empty());
}
