use pastelens_crypto::{decrypt_raw, CipherProfile};
use tracing::trace;

use super::{Classification, Evidence, Rule, RuleContext};
use crate::{analyzer::analyze_with_threshold, kind::ContentKind};

/// Speculative decryption against every configured profile, in order.
///
/// Asymmetric profiles always take part. An earlier rule may ask for them to
/// be tried first.
pub struct DecryptionSweepRule;

impl Rule for DecryptionSweepRule {
    fn name(&self) -> &'static str { "decryption-sweep" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        let candidates = sweep_order(ctx.profiles(), ctx.prefers_asymmetric());
        let (profile, plaintext) = sweep(ctx.text(), candidates, ctx.config().readable_threshold)?;
        Some(Classification {
            kind:     ContentKind::Ciphertext,
            evidence: Evidence::Decrypted {
                profile,
                plaintext,
            },
        })
    }
}

/// Every profile, with the asymmetric ones moved to the front when
/// `asymmetric_first` is set. Relative order within each group is kept.
pub fn sweep_order(profiles: &[CipherProfile], asymmetric_first: bool) -> Vec<&CipherProfile> {
    if !asymmetric_first {
        return profiles.iter().collect();
    }
    let (mut ordered, symmetric): (Vec<_>, Vec<_>) = profiles.iter().partition(|profile| profile.is_asymmetric());
    ordered.extend(symmetric);
    ordered
}

/// Tries `profiles` in order and returns the first profile name and
/// plaintext that survive.
///
/// A decryption survives when it completes and either the profile fails
/// hard on wrong keys or the lossy UTF-8 view of its output is readable at
/// `threshold`. Per-profile failures are traced and skipped.
pub fn sweep<'a>(
    text: &str,
    profiles: impl IntoIterator<Item = &'a CipherProfile>,
    threshold: f64,
) -> Option<(String, String)> {
    if text.trim().is_empty() {
        return None;
    }
    profiles.into_iter().find_map(|profile| {
        let raw = match decrypt_raw(text, profile) {
            Ok(raw) => raw,
            Err(e) => {
                trace!("Profile '{}' rejected input: {}", profile.name(), e);
                return None;
            },
        };
        let view = String::from_utf8_lossy(&raw);
        if !profile.fails_hard_on_wrong_key() && !analyze_with_threshold(&view, threshold).is_readable {
            trace!("Profile '{}' produced unreadable output", profile.name());
            return None;
        }
        let chain = profile.plaintext_encoding();
        let plaintext = if chain.is_identity() {
            view.into_owned()
        }
        else {
            chain.encode(&raw)
        };
        Some((profile.name().to_owned(), plaintext))
    })
}
