//! Security identifiers.
//!
//! # Binary layout (MS-DTYP 2.4.2)
//!
//! ```text
//! Offset  Size  Field
//! 0       1     Revision
//! 1       1     SubAuthorityCount
//! 2       6     IdentifierAuthority (big-endian)
//! 8       4*N   SubAuthorities (little-endian)
//! ```
//!
//! Text form is `S-<revision>-<authority>-<sub-authority-1>-...-<sub-authority-N>`.
//! The last sub-authority is the relative identifier (RID).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum number of sub-authorities a SID may carry.
pub const MAX_SUB_AUTHORITIES: usize = 15;

const HEADER_LEN: usize = 8;
const AUTHORITY_MAX: u64 = (1 << 48) - 1;

/// SID decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SidError {
    /// Fewer bytes than the fixed header.
    #[error("SID too short: {0} bytes (minimum 8)")]
    TooShort(usize),

    /// Header announces more sub-authorities than the buffer holds.
    #[error("SID truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the announced sub-authority count.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The SID has no sub-authority to hold a RID.
    #[error("SID has no sub-authorities")]
    NoSubAuthorities,

    /// Text form could not be parsed.
    #[error("invalid SID string: {0}")]
    InvalidString(String),
}

/// A decoded security identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sid {
    revision: u8,
    authority: u64,
    sub_authorities: Vec<u32>,
}

impl Sid {
    /// Creates a SID from its parts.
    ///
    /// ## Errors
    ///
    /// Fails if the authority exceeds 48 bits or there are more than
    /// [`MAX_SUB_AUTHORITIES`] sub-authorities.
    pub fn new(revision: u8, authority: u64, sub_authorities: Vec<u32>) -> Result<Self, SidError> {
        if authority > AUTHORITY_MAX || sub_authorities.len() > MAX_SUB_AUTHORITIES {
            return Err(SidError::InvalidString(format!(
                "S-{revision}-{authority} with {} sub-authorities",
                sub_authorities.len()
            )));
        }
        Ok(Self {
            revision,
            authority,
            sub_authorities,
        })
    }

    /// Decodes the binary form. Bytes past the announced length are ignored.
    ///
    /// ## Errors
    ///
    /// Returns [`SidError::TooShort`] or [`SidError::Truncated`] for buffers
    /// that cannot hold the announced structure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SidError> {
        if bytes.len() < HEADER_LEN {
            return Err(SidError::TooShort(bytes.len()));
        }

        let revision = bytes[0];
        let count = usize::from(bytes[1]);
        let expected = HEADER_LEN + count * 4;
        if bytes.len() < expected {
            return Err(SidError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let authority = bytes[2..HEADER_LEN]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

        let sub_authorities = bytes[HEADER_LEN..expected]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self {
            revision,
            authority,
            sub_authorities,
        })
    }

    /// Encodes the binary form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.sub_authorities.len() * 4);
        bytes.push(self.revision);
        // Bounded by MAX_SUB_AUTHORITIES.
        bytes.push(self.sub_authorities.len() as u8);
        bytes.extend_from_slice(&self.authority.to_be_bytes()[2..]);
        for sub in &self.sub_authorities {
            bytes.extend_from_slice(&sub.to_le_bytes());
        }
        bytes
    }

    /// Revision number.
    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.revision
    }

    /// 48-bit identifier authority.
    #[must_use]
    pub const fn authority(&self) -> u64 {
        self.authority
    }

    /// Sub-authorities, RID last.
    #[must_use]
    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Relative identifier (last sub-authority).
    #[must_use]
    pub fn rid(&self) -> Option<u32> {
        self.sub_authorities.last().copied()
    }

    /// The issuing domain: this SID without its RID.
    #[must_use]
    pub fn domain(&self) -> Self {
        let mut domain = self.clone();
        domain.sub_authorities.pop();
        domain
    }

    /// Returns a SID in the same domain with the RID replaced.
    ///
    /// ## Errors
    ///
    /// Returns [`SidError::NoSubAuthorities`] if there is no RID to replace.
    pub fn with_rid(&self, rid: u32) -> Result<Self, SidError> {
        let mut sid = self.clone();
        match sid.sub_authorities.last_mut() {
            Some(last) => *last = rid,
            None => return Err(SidError::NoSubAuthorities),
        }
        Ok(sid)
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-{}", self.revision, self.authority)?;
        for sub in &self.sub_authorities {
            write!(f, "-{sub}")?;
        }
        Ok(())
    }
}

impl FromStr for Sid {
    type Err = SidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SidError::InvalidString(s.to_string());

        let mut parts = s.split('-');
        if !parts.next().is_some_and(|p| p.eq_ignore_ascii_case("S")) {
            return Err(invalid());
        }
        let revision = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(invalid)?;
        let authority = parts.next().and_then(parse_authority).ok_or_else(invalid)?;
        let sub_authorities = parts
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(revision, authority, sub_authorities).map_err(|_| invalid())
    }
}

fn parse_authority(text: &str) -> Option<u64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
