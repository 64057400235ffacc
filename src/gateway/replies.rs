//! Seedable phrasing chooser.
//!
//! Which member of a reply family gets sent is cosmetic. Tests pin the
//! seed (or assert on the family) instead of on exact text.

use crate::i18n::{self, Family};
use convoy_core::intent::Intent;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::sync::Mutex;

pub struct ReplyChooser {
    rng: Mutex<StdRng>,
}

impl ReplyChooser {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Pick one entry. Empty families yield an empty string.
    pub fn pick(&self, options: &[&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        options.choose(&mut *rng).copied().unwrap_or_default()
    }

    pub fn from_family(&self, family: Family, lang: &str) -> &'static str {
        self.pick(i18n::family(family, lang))
    }

    /// Acknowledgement sent right before an action handler runs.
    pub fn ack(&self, intent: Intent, lang: &str) -> String {
        let template = self.from_family(Family::Ack, lang);
        i18n::ack(template, i18n::topic(intent.domain(), lang))
    }
}
