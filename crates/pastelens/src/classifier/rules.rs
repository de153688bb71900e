use std::net::IpAddr;

use tracing::trace;

use super::{Classification, Rule, RuleContext};
use crate::{
    cron::looks_like_cron,
    kind::ContentKind,
    links::{looks_like_domain, looks_like_url},
    network::parse_address,
    timestamp::{looks_like_unix_timestamp, parse_date_time},
};

/// IPv4/IPv6 literals, optionally with a CIDR prefix.
pub struct NetworkAddressRule;

impl Rule for NetworkAddressRule {
    fn name(&self) -> &'static str { "network-address" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        let parsed = parse_address(ctx.text())?;
        let kind = match (parsed.address, parsed.prefix) {
            (IpAddr::V4(_), None) => ContentKind::NetworkAddress,
            (IpAddr::V4(_), Some(_)) => ContentKind::Cidr,
            (IpAddr::V6(_), None) => ContentKind::NetworkAddressV6,
            (IpAddr::V6(_), Some(_)) => ContentKind::CidrV6,
        };
        Some(Classification::by_rule(kind, self.name()))
    }
}

/// 5, 6 or 7 field cron expressions.
pub struct CronRule;

impl Rule for CronRule {
    fn name(&self) -> &'static str { "cron" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        looks_like_cron(ctx.text()).then(|| Classification::by_rule(ContentKind::Cron, self.name()))
    }
}

/// 10- or 13-digit Unix timestamps.
pub struct TimestampRule;

impl Rule for TimestampRule {
    fn name(&self) -> &'static str { "unix-timestamp" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        looks_like_unix_timestamp(ctx.text()).then(|| Classification::by_rule(ContentKind::Timestamp, self.name()))
    }
}

/// RFC 3339, RFC 2822 and ISO-like date-time literals.
pub struct DateTimeRule;

impl Rule for DateTimeRule {
    fn name(&self) -> &'static str { "date-time" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        parse_date_time(ctx.text()).map(|_| Classification::by_rule(ContentKind::DateTime, self.name()))
    }
}

/// Long base64 blobs may be RSA ciphertext.
///
/// This is a weak signal: the rule never classifies, it only moves the
/// asymmetric profiles to the front of the decryption sweep that follows.
pub struct RsaHeuristicRule;

impl Rule for RsaHeuristicRule {
    fn name(&self) -> &'static str { "rsa-ciphertext" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        let text = ctx.text();
        let has_asymmetric = ctx.profiles().iter().any(|profile| profile.is_asymmetric());
        if has_asymmetric && text.len() >= ctx.config().rsa_min_length && is_base64_alphabet(text) {
            trace!("Input looks like RSA ciphertext, trying asymmetric profiles first");
            ctx.prefer_asymmetric();
        }
        None
    }
}

/// `scheme://` and `mailto:`-style literals, possibly percent-encoded.
pub struct UrlRule;

impl Rule for UrlRule {
    fn name(&self) -> &'static str { "url" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        looks_like_url(ctx.text()).then(|| Classification::by_rule(ContentKind::Url, self.name()))
    }
}

/// Bare domain names.
pub struct DomainRule;

impl Rule for DomainRule {
    fn name(&self) -> &'static str { "domain" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        looks_like_domain(ctx.text()).then(|| Classification::by_rule(ContentKind::Domain, self.name()))
    }
}

/// Base64-shaped text that nothing else claimed.
pub struct EncodedBlobRule;

impl Rule for EncodedBlobRule {
    fn name(&self) -> &'static str { "base64-blob" }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Classification> {
        is_base64_blob(ctx.text()).then(|| Classification::by_rule(ContentKind::EncodedGeneric, self.name()))
    }
}

/// Standard or URL-safe base64 characters plus `=`.
fn is_base64_alphabet(text: &str) -> bool {
    text.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_' | b'='))
}

/// Standard base64 with a length multiple of 4 and at most two trailing `=`.
pub fn is_base64_blob(text: &str) -> bool {
    let body = text.trim_end_matches('=');
    !text.is_empty()
        && text.len() % 4 == 0
        && text.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}
