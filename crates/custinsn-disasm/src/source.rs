//! Where catalog documents come from.
//!
//! A locator string names a file on the local machine, an annex served by a
//! remote debug target (`remote:<annex>`), or nothing at all (empty string).
//! Remote annexes are read in fixed-size chunks with `qXfer:features:read`
//! packets; each reply starts with `m` when more data follows or `l` for the
//! last chunk.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::CatalogError;

/// Prefix selecting a remote annex.
pub const REMOTE_PREFIX: &str = "remote:";
/// Annex used when the locator is just `remote:`.
pub const DEFAULT_REMOTE_ANNEX: &str = "insn.xml";
/// Bytes requested per `qXfer` packet.
pub const FETCH_CHUNK_SIZE: usize = 200;
/// Largest annex accepted from a target.
pub const MAX_ANNEX_SIZE: usize = 1 << 20;

/// Parsed catalog locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum CatalogLocator {
    /// No catalog is loaded.
    #[default]
    Disabled,
    /// A file on the local machine.
    Local(PathBuf),
    /// An annex fetched from the remote target.
    Remote(String),
}

impl CatalogLocator {
    /// Parses a locator string. `remote:` alone selects the default annex.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            return Self::Disabled;
        }
        match value.strip_prefix(REMOTE_PREFIX) {
            Some("") => Self::Remote(DEFAULT_REMOTE_ANNEX.to_string()),
            Some(annex) => Self::Remote(annex.to_string()),
            None => Self::Local(PathBuf::from(value)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Human-readable description for settings displays.
    pub fn describe(&self) -> String {
        match self {
            Self::Disabled => "Custom instructions are not loaded.".to_string(),
            Self::Local(_) => format!("Custom instructions read from local file \"{}\".", self),
            Self::Remote(_) => format!("Custom instructions read from remote file \"{}\".", self),
        }
    }
}

impl FromStr for CatalogLocator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for CatalogLocator {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<CatalogLocator> for String {
    fn from(locator: CatalogLocator) -> Self {
        locator.to_string()
    }
}

impl std::fmt::Display for CatalogLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => Ok(()),
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(annex) => write!(f, "{}{}", REMOTE_PREFIX, annex),
        }
    }
}

/// A connection able to exchange remote-protocol packets with a target.
pub trait AnnexReader {
    /// Sends one packet and returns the reply payload.
    fn send_packet(&mut self, packet: &str) -> Result<String, CatalogError>;
}

/// Reads a whole annex from the target, one chunk at a time.
pub fn fetch_remote_annex(reader: &mut dyn AnnexReader, annex: &str) -> Result<String, CatalogError> {
    if annex.is_empty() {
        return Err(CatalogError::remote(annex, "missing annex name"));
    }

    let mut document = String::new();
    let mut offset = 0usize;
    loop {
        let packet = format!(
            "qXfer:features:read:{}:{:x},{:x}",
            annex, offset, FETCH_CHUNK_SIZE
        );
        let reply = reader.send_packet(&packet)?;

        let mut chars = reply.chars();
        let marker = chars.next();
        let payload = chars.as_str();
        match marker {
            Some('l') => {
                document.push_str(payload);
                if document.len() > MAX_ANNEX_SIZE {
                    return Err(CatalogError::remote(annex, "annex too large"));
                }
                return Ok(document);
            }
            Some('m') if !payload.is_empty() => {
                document.push_str(payload);
                offset += payload.len();
                if document.len() > MAX_ANNEX_SIZE {
                    return Err(CatalogError::remote(annex, "annex too large"));
                }
            }
            Some('m') => return Err(CatalogError::remote(annex, "empty partial reply")),
            Some('E') => return Err(CatalogError::remote(annex, format!("target error {}", payload))),
            _ => return Err(CatalogError::remote(annex, format!("unexpected reply {:?}", reply))),
        }
    }
}

/// Obtains the catalog document named by `locator`.
///
/// Returns `Ok(None)` when the locator is disabled, or when it names a remote
/// annex but no target connection is available.
pub fn fetch_catalog_text(
    locator: &CatalogLocator,
    annex: Option<&mut dyn AnnexReader>,
) -> Result<Option<String>, CatalogError> {
    match locator {
        CatalogLocator::Disabled => Ok(None),
        CatalogLocator::Local(path) => Ok(Some(fs::read_to_string(path)?)),
        CatalogLocator::Remote(name) => match annex {
            Some(reader) => fetch_remote_annex(reader, name).map(Some),
            None => Ok(None),
        },
    }
}
