//! Ordered, first-match-wins content classification.
//!
//! A [`Classifier`] holds a list of [`Rule`] objects evaluated in order over
//! the trimmed input; the first rule that returns a [`Classification`] wins.
//! The speculative decryption sweep is one of those rules. Nothing is cached
//! between calls, so the same text and profile list always classify the same
//! way.

mod rules;
mod sweep;

use std::{cell::Cell, fmt};

use pastelens_crypto::CipherProfile;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub use self::{
    rules::{
        is_base64_blob,
        CronRule,
        DateTimeRule,
        DomainRule,
        EncodedBlobRule,
        NetworkAddressRule,
        RsaHeuristicRule,
        TimestampRule,
        UrlRule,
    },
    sweep::{sweep, sweep_order, DecryptionSweepRule},
};
use crate::{analyzer::DEFAULT_READABLE_THRESHOLD, kind::ContentKind};

/// Tunables for the heuristic rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Printable ratio a non-validating decryption must reach
    pub readable_threshold: f64,
    /// Minimum length of a base64 blob before asymmetric profiles are tried first
    pub rsa_min_length:     usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            readable_threshold: DEFAULT_READABLE_THRESHOLD,
            rsa_min_length:     50,
        }
    }
}

/// Why a kind was assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    /// A syntactic rule matched
    Rule {
        name: &'static str,
    },
    /// A profile decrypted the input
    Decrypted {
        profile:   String,
        plaintext: String,
    },
    /// No rule matched
    Fallback,
}

/// Result of classifying one input snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind:     ContentKind,
    pub evidence: Evidence,
}

impl Classification {
    pub const fn by_rule(kind: ContentKind, name: &'static str) -> Self {
        Self {
            kind,
            evidence: Evidence::Rule {
                name,
            },
        }
    }

    /// Inconclusive input: shown as generic encoded content.
    pub const fn fallback() -> Self {
        Self {
            kind:     ContentKind::EncodedGeneric,
            evidence: Evidence::Fallback,
        }
    }
}

/// Per-call state shared by the rules of one classification.
pub struct RuleContext<'a> {
    text:              &'a str,
    profiles:          &'a [CipherProfile],
    config:            &'a ClassifierConfig,
    prefer_asymmetric: Cell<bool>,
}

impl<'a> RuleContext<'a> {
    pub const fn new(text: &'a str, profiles: &'a [CipherProfile], config: &'a ClassifierConfig) -> Self {
        Self {
            text,
            profiles,
            config,
            prefer_asymmetric: Cell::new(false),
        }
    }

    /// The trimmed input.
    pub const fn text(&self) -> &'a str { self.text }

    pub const fn profiles(&self) -> &'a [CipherProfile] { self.profiles }

    pub const fn config(&self) -> &'a ClassifierConfig { self.config }

    /// Makes the sweep try asymmetric profiles before symmetric ones.
    pub fn prefer_asymmetric(&self) { self.prefer_asymmetric.set(true); }

    pub fn prefers_asymmetric(&self) -> bool { self.prefer_asymmetric.get() }
}

/// One step of the classification chain.
pub trait Rule: Send + Sync {
    /// Stable identifier, reported in [`Evidence::Rule`] and logs.
    fn name(&self) -> &'static str;

    /// Returns a classification to stop the chain, `None` to pass.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification>;
}

/// The rule chain plus its configuration.
pub struct Classifier {
    config: ClassifierConfig,
    rules:  Vec<Box<dyn Rule>>,
}

impl Classifier {
    /// A classifier with the standard rule order.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// A classifier with a custom rule chain.
    pub fn with_rules(config: ClassifierConfig, rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            config,
            rules,
        }
    }

    pub const fn config(&self) -> &ClassifierConfig { &self.config }

    /// Classifies `text` against the ordered `profiles`. Never fails.
    pub fn classify(&self, text: &str, profiles: &[CipherProfile]) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            trace!("Blank input, skipping rules");
            return Classification::fallback();
        }

        let ctx = RuleContext::new(text, profiles, &self.config);
        for rule in &self.rules {
            if let Some(classification) = rule.evaluate(&ctx) {
                debug!("Rule '{}' classified input as {}", rule.name(), classification.kind);
                return classification;
            }
        }
        debug!("No rule matched, falling back to {}", ContentKind::EncodedGeneric);
        Classification::fallback()
    }
}

impl Default for Classifier {
    fn default() -> Self { Self::new(ClassifierConfig::default()) }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|rule| rule.name()).collect();
        f.debug_struct("Classifier")
            .field("config", &self.config)
            .field("rules", &names)
            .finish()
    }
}

/// The standard chain: addresses, cron, timestamps, date-times, the RSA
/// ordering heuristic, the decryption sweep, URLs, domains, base64 blobs.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NetworkAddressRule),
        Box::new(CronRule),
        Box::new(TimestampRule),
        Box::new(DateTimeRule),
        Box::new(RsaHeuristicRule),
        Box::new(DecryptionSweepRule),
        Box::new(UrlRule),
        Box::new(DomainRule),
        Box::new(EncodedBlobRule),
    ]
}

/// Classifies with the default configuration.
pub fn classify(text: &str, profiles: &[CipherProfile]) -> Classification { Classifier::default().classify(text, profiles) }
