#![forbid(unsafe_code)]

//! Typing effect for the hero tagline.
//!
//! The stepper is deterministic and host-driven: the host calls
//! [`Typewriter::step`] once per timer tick and stops its timer when it
//! returns `None`.

/// Reveals a string one character per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    /// Advance by one character and return the visible prefix.
    pub fn step(&mut self) -> Option<String> {
        if self.is_done() {
            return None;
        }
        self.shown += 1;
        Some(self.visible())
    }

    #[must_use]
    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }

    pub fn reset(&mut self) {
        self.shown = 0;
    }
}
