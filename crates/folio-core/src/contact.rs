#![forbid(unsafe_code)]

//! Contact form submission.
//!
//! Delivery is delegated to a [`ContactSink`]. The stock page has no
//! backend, so [`LogOnlySink`] accepts everything; a real deployment plugs in
//! an email service or API client behind the same trait.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dom::PageDom;

pub const SUCCESS_MESSAGE: &str = "Thank you for your message! I will get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

const FIELD_IDS: [&str; 4] = ["name", "email", "subject", "message"];

/// Values collected from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Delivery failure reported by a [`ContactSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The service refused the message.
    Rejected(String),
    /// The service could not be reached.
    Unavailable(String),
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "message rejected: {msg}"),
            Self::Unavailable(msg) => write!(f, "contact service unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ContactError {}

/// External delivery collaborator.
pub trait ContactSink {
    fn submit_contact(&mut self, fields: &ContactFields) -> Result<(), ContactError>;
}

/// Sink that only logs; used when no delivery integration is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlySink;

impl ContactSink for LogOnlySink {
    fn submit_contact(&mut self, _fields: &ContactFields) -> Result<(), ContactError> {
        Ok(())
    }
}

impl<F> ContactSink for F
where
    F: FnMut(&ContactFields) -> Result<(), ContactError>,
{
    fn submit_contact(&mut self, fields: &ContactFields) -> Result<(), ContactError> {
        self(fields)
    }
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Sent(ContactFields),
    Failed(ContactError),
    /// The page has no `#contact-form`.
    NoForm,
}

#[derive(Debug, Clone)]
pub struct ContactForm<H> {
    form: Option<H>,
    fields: [Option<H>; 4],
}

impl<H: Clone + PartialEq + fmt::Debug> ContactForm<H> {
    pub fn bind<D: PageDom<Handle = H>>(dom: &D) -> Self {
        Self {
            form: dom.by_id("contact-form"),
            fields: FIELD_IDS.map(|id| dom.by_id(id)),
        }
    }

    #[must_use]
    pub fn form(&self) -> Option<&H> {
        self.form.as_ref()
    }

    /// Read the four fields. Missing elements read as empty strings.
    #[must_use]
    pub fn collect<D: PageDom<Handle = H>>(&self, dom: &D) -> ContactFields {
        let [name, email, subject, message] = self
            .fields
            .each_ref()
            .map(|el| el.as_ref().and_then(|el| dom.value(el)).unwrap_or_default());
        ContactFields {
            name,
            email,
            subject,
            message,
        }
    }

    /// Form submit: collect, deliver, acknowledge. The form is reset only
    /// after a successful delivery.
    pub fn on_submit<D, C>(&self, dom: &mut D, sink: &mut C) -> Submission
    where
        D: PageDom<Handle = H>,
        C: ContactSink + ?Sized,
    {
        let Some(form) = &self.form else {
            return Submission::NoForm;
        };
        let fields = self.collect(dom);
        let payload = serde_json::to_string(&fields).unwrap_or_default();
        info!(form = %payload, "contact form submitted");

        match sink.submit_contact(&fields) {
            Ok(()) => {
                acknowledge(dom, SUCCESS_MESSAGE);
                if let Err(err) = dom.reset_form(form) {
                    warn!(error = %err, "could not reset contact form");
                }
                Submission::Sent(fields)
            }
            Err(err) => {
                warn!(error = %err, "contact delivery failed");
                acknowledge(dom, FAILURE_MESSAGE);
                Submission::Failed(err)
            }
        }
    }
}

fn acknowledge<D: PageDom>(dom: &mut D, message: &str) {
    if let Err(err) = dom.alert(message) {
        warn!(error = %err, "could not show acknowledgment");
    }
}
