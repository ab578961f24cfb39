#![forbid(unsafe_code)]

//! `folio-core`: host-agnostic behavior for the Folio portfolio page.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment (the browser, via `folio-web`)
//!   forwards DOM events; nothing here touches a real window.
//! - **Injected document**: all reads and writes go through [`PageDom`], so
//!   each feature is testable against [`HeadlessDom`].
//! - **Degrade, don't fail**: a missing element or a rejected write disables
//!   one feature and is logged through `tracing`.

pub mod config;
pub mod contact;
pub mod controller;
pub mod dom;
pub mod filter;
pub mod github;
pub mod headless;
pub mod lazy;
pub mod menu;
pub mod nav;
pub mod parallax;
pub mod reveal;
pub mod scroll;
pub mod storage;
pub mod theme;
pub mod tilt;
pub mod typewriter;
pub mod year;

pub use config::{CategoryMatch, ConfigError, PageConfig};
pub use contact::{ContactError, ContactFields, ContactSink, LogOnlySink};
pub use controller::{EventOutcome, ListenerTargets, ObserverKind, PageController, PageEvent, StartReport};
pub use dom::{DomError, DomResult, IntersectionEntry, PageDom, Rect};
pub use headless::{ElementSpec, HeadlessDom, NodeId};
pub use storage::{MemoryStore, PreferenceStore, StoreError};
pub use theme::Theme;
