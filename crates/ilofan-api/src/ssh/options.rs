// SSH session tuning: port, key exchange, round-trip timeout.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use russh::{Preferred, client, kex};

/// Key-exchange algorithms the command session can offer.
///
/// iLO 4 firmware only speaks `diffie-hellman-group14-sha1`, which modern
/// SSH stacks no longer offer by default, so the choice is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KexAlgorithm {
    /// `diffie-hellman-group14-sha1` (legacy iLO firmware).
    DiffieHellmanGroup14Sha1,
    /// `diffie-hellman-group14-sha256`
    DiffieHellmanGroup14Sha256,
    /// `curve25519-sha256`
    Curve25519Sha256,
}

impl KexAlgorithm {
    pub const ALL: [Self; 3] = [
        Self::DiffieHellmanGroup14Sha1,
        Self::DiffieHellmanGroup14Sha256,
        Self::Curve25519Sha256,
    ];

    /// Wire name as sent in `KEXINIT`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DiffieHellmanGroup14Sha1 => "diffie-hellman-group14-sha1",
            Self::DiffieHellmanGroup14Sha256 => "diffie-hellman-group14-sha256",
            Self::Curve25519Sha256 => "curve25519-sha256",
        }
    }

    fn to_russh(self) -> kex::Name {
        match self {
            Self::DiffieHellmanGroup14Sha1 => kex::DH_G14_SHA1,
            Self::DiffieHellmanGroup14Sha256 => kex::DH_G14_SHA256,
            Self::Curve25519Sha256 => kex::CURVE25519,
        }
    }
}

impl fmt::Display for KexAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KexAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|alg| alg.as_str()).collect();
                format!("unknown key exchange '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Options for opening a command session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub port: u16,
    /// Offered key exchanges, in preference order. Never empty.
    pub kex: Vec<KexAlgorithm>,
    /// Bound on connect + auth, and on each command round trip.
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            port: 22,
            kex: vec![KexAlgorithm::DiffieHellmanGroup14Sha1],
            timeout: Duration::from_secs(30),
        }
    }
}

impl SessionOptions {
    pub fn with_kex(mut self, kex: Vec<KexAlgorithm>) -> Self {
        if !kex.is_empty() {
            self.kex = kex;
        }
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    pub(crate) fn client_config(&self) -> client::Config {
        let kex: Vec<kex::Name> = self.kex.iter().map(|alg| alg.to_russh()).collect();
        client::Config {
            inactivity_timeout: Some(self.timeout),
            preferred: Preferred {
                kex: Cow::Owned(kex),
                ..Preferred::default()
            },
            ..client::Config::default()
        }
    }
}
