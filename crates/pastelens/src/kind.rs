use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of content kinds the classifier can assign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    NetworkAddress,
    NetworkAddressV6,
    Cidr,
    CidrV6,
    Cron,
    Timestamp,
    DateTime,
    Url,
    Domain,
    EncodedGeneric,
    Ciphertext,
}

impl ContentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkAddress => "network-address",
            Self::NetworkAddressV6 => "network-address-v6",
            Self::Cidr => "cidr",
            Self::CidrV6 => "cidr-v6",
            Self::Cron => "cron",
            Self::Timestamp => "timestamp",
            Self::DateTime => "date-time",
            Self::Url => "url",
            Self::Domain => "domain",
            Self::EncodedGeneric => "encoded-generic",
            Self::Ciphertext => "ciphertext",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_display() {
        for kind in [
            ContentKind::NetworkAddressV6,
            ContentKind::CidrV6,
            ContentKind::DateTime,
            ContentKind::EncodedGeneric,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
