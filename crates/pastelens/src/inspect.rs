//! Per-kind transforms applied after classification.
//!
//! [`inspect`] classifies the input and then runs the conversion a consumer
//! would show for that kind: subnet arithmetic for CIDR blocks, upcoming runs
//! for cron expressions, calendar forms for timestamps, components for URLs,
//! candidate decodings for encoded blobs and the recovered plaintext for
//! ciphertext.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use pastelens_crypto::{detect_and_decode, CipherProfile, Encoding};
use serde::Serialize;
use tracing::debug;

use crate::{
    analyzer::{analyze_with_threshold, PrintableAnalysis},
    classifier::{Classification, Classifier, ClassifierConfig, Evidence},
    cron::{CronLayout, CronSchedule},
    error::{PastelensError, Result},
    kind::ContentKind,
    links::{domain_detail, url_detail, DomainDetail, UrlDetail},
    network::{parse_address, AddressInfo, Ipv4Subnet, Ipv6Subnet},
    timestamp::{date_time_detail, parse_unix_timestamp, TimeDetail},
};

/// Number of upcoming cron runs reported.
pub const NEXT_RUNS: usize = 5;

/// One successful decoding of an encoded blob.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EncodedView {
    pub encoding: Encoding,
    /// Lossy UTF-8 view of the decoded bytes
    pub text:     String,
    pub analysis: PrintableAnalysis,
}

/// The kind-specific result of [`inspect`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Detail {
    Address(AddressInfo),
    Ipv4Subnet(Ipv4Subnet),
    Ipv6Subnet(Ipv6Subnet),
    Cron {
        expression: String,
        layout:     CronLayout,
        next_runs:  Vec<DateTime<Utc>>,
    },
    Timestamp(TimeDetail),
    DateTime(TimeDetail),
    Url(UrlDetail),
    Domain(DomainDetail),
    Encoded {
        candidates: Vec<EncodedView>,
    },
    Decrypted {
        profile:   String,
        plaintext: String,
    },
}

/// A classification together with its transform.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Inspection {
    pub classification: Classification,
    pub detail:         Detail,
}

/// Classifies `text` and computes the detail for the assigned kind.
///
/// `now` anchors the cron schedule so callers (and tests) control the clock.
///
/// # Errors
///
/// Classification itself never fails. The follow-up transform can: a cron
/// expression using `L`, `W` or `#` is recognised but cannot be scheduled,
/// and the URL parser is stricter than the URL shape check.
pub fn inspect(
    text: &str,
    profiles: &[CipherProfile],
    config: &ClassifierConfig,
    now: DateTime<Utc>,
) -> Result<Inspection> {
    let classification = Classifier::new(*config).classify(text, profiles);
    let text = text.trim();
    debug!("Inspecting input classified as {}", classification.kind);

    let detail = match classification.kind {
        ContentKind::NetworkAddress | ContentKind::NetworkAddressV6 => {
            let parsed = parse_address(text).ok_or_else(|| invalid_address(text))?;
            Detail::Address(AddressInfo::new(parsed.address))
        },
        ContentKind::Cidr | ContentKind::CidrV6 => {
            let parsed = parse_address(text).ok_or_else(|| invalid_address(text))?;
            let prefix = parsed.prefix.ok_or_else(|| invalid_address(text))?;
            match parsed.address {
                IpAddr::V4(v4) => Detail::Ipv4Subnet(Ipv4Subnet::new(v4, prefix)?),
                IpAddr::V6(v6) => Detail::Ipv6Subnet(Ipv6Subnet::new(v6, prefix)?),
            }
        },
        ContentKind::Cron => {
            let schedule = CronSchedule::parse(text)?;
            Detail::Cron {
                expression: schedule.expression().to_owned(),
                layout:     schedule.layout(),
                next_runs:  schedule.next_runs(now, NEXT_RUNS),
            }
        },
        ContentKind::Timestamp => Detail::Timestamp(parse_unix_timestamp(text)?),
        ContentKind::DateTime => Detail::DateTime(date_time_detail(text)?),
        ContentKind::Url => Detail::Url(url_detail(text)?),
        ContentKind::Domain => {
            Detail::Domain(domain_detail(text).ok_or_else(|| {
                PastelensError::InvalidUrl {
                    input:  text.to_owned(),
                    reason: "not a domain name".to_owned(),
                }
            })?)
        },
        ContentKind::Ciphertext | ContentKind::EncodedGeneric => {
            match &classification.evidence {
                Evidence::Decrypted {
                    profile,
                    plaintext,
                } => {
                    Detail::Decrypted {
                        profile:   profile.clone(),
                        plaintext: plaintext.clone(),
                    }
                },
                Evidence::Rule {
                    ..
                }
                | Evidence::Fallback => encoded_views(text, config.readable_threshold),
            }
        },
    };

    Ok(Inspection {
        classification,
        detail,
    })
}

fn encoded_views(text: &str, threshold: f64) -> Detail {
    let candidates = detect_and_decode(text)
        .into_iter()
        .map(|candidate| {
            let text = String::from_utf8_lossy(&candidate.bytes).into_owned();
            let analysis = analyze_with_threshold(&text, threshold);
            EncodedView {
                encoding: candidate.encoding,
                text,
                analysis,
            }
        })
        .collect();
    Detail::Encoded {
        candidates,
    }
}

fn invalid_address(text: &str) -> PastelensError {
    PastelensError::InvalidAddress {
        input: text.to_owned(),
    }
}
