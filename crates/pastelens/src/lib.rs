//! # Pastelens
//!
//! Classifies a pasted text fragment into one of a closed set of content
//! kinds and computes the reversible transform a consumer shows for it.
//! Encodings and ciphers live in [`pastelens_crypto`]; this crate adds the
//! printable-ratio analyzer, the ordered rule classifier with its speculative
//! decryption sweep, the per-kind transforms and a JSON profile store.

pub mod analyzer;
pub mod classifier;
pub mod cron;
pub mod error;
pub mod inspect;
pub mod kind;
pub mod links;
pub mod network;
pub mod store;
pub mod timestamp;

pub use analyzer::{analyze, analyze_with_threshold, PrintableAnalysis, DEFAULT_READABLE_THRESHOLD};
pub use classifier::{classify, Classification, Classifier, ClassifierConfig, Evidence, Rule, RuleContext};
pub use cron::{CronError, CronLayout, CronSchedule};
pub use error::{PastelensError, Result};
pub use inspect::{inspect, Detail, EncodedView, Inspection};
pub use kind::ContentKind;
pub use store::{JsonProfileStore, ProfileStore};
