//! Per-connection decode sessions.
//!
//! A [`DecodeSession`] pairs one loaded catalog with the disassembly
//! entry points. [`SessionCache`] keeps one session per execution context
//! (for a debugger, one per target connection), builds it on first use and
//! throws it away when the context goes away or the catalog locator changes.
//! Sessions are never refreshed in place.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use custinsn_core::Xlen;

use crate::catalog::Catalog;
use crate::disassembler::CustomDisassembler;
use crate::source::{AnnexReader, CatalogLocator};
use crate::traits::{DecodedInstruction, MemoryReader};
use crate::DecodeError;

/// User-facing settings for custom instruction display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplaySettings {
    /// When false, nothing is decoded and callers use their default decoder.
    pub enabled: bool,
    /// Where the catalog is read from.
    pub locator: CatalogLocator,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            locator: CatalogLocator::Disabled,
        }
    }
}

/// One loaded catalog, bound to a single execution context.
#[derive(Debug, Clone, Default)]
pub struct DecodeSession {
    catalog: Catalog,
}

impl DecodeSession {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A disassembler over this session's catalog for the given target width.
    pub fn disassembler(&self, xlen: Xlen) -> CustomDisassembler<'_> {
        CustomDisassembler::new(&self.catalog, xlen)
    }
}

/// Decode sessions keyed by an opaque context identity.
///
/// Callers serialize access; nothing here is synchronized.
#[derive(Debug)]
pub struct SessionCache<K> {
    settings: DisplaySettings,
    sessions: HashMap<K, DecodeSession>,
}

impl<K: Eq + Hash + Debug> SessionCache<K> {
    pub fn new(settings: DisplaySettings) -> Self {
        Self {
            settings,
            sessions: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }

    /// Changes the catalog locator and discards every session, so the next
    /// request for any context loads from the new location.
    pub fn set_locator(&mut self, locator: CatalogLocator) {
        if !self.sessions.is_empty() {
            log::debug!(
                "catalog locator changed to {:?}, discarding {} sessions",
                locator,
                self.sessions.len()
            );
        }
        self.settings.locator = locator;
        self.sessions.clear();
    }

    /// Returns the session for `key`, building it with `load` if absent.
    pub fn session_with<F>(&mut self, key: K, load: F) -> &DecodeSession
    where
        F: FnOnce(&CatalogLocator) -> Catalog,
    {
        let locator = &self.settings.locator;
        self.sessions.entry(key).or_insert_with_key(|key| {
            let catalog = load(locator);
            log::debug!("new decode session for {:?} with {} entries", key, catalog.len());
            DecodeSession::new(catalog)
        })
    }

    /// Returns the session for `key`, loading the catalog from the configured
    /// locator if absent. `annex` is the context's remote connection, if any.
    pub fn session(&mut self, key: K, annex: Option<&mut dyn AnnexReader>) -> &DecodeSession {
        self.session_with(key, |locator| Catalog::load(locator, annex))
    }

    pub fn get(&self, key: &K) -> Option<&DecodeSession> {
        self.sessions.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.sessions.contains_key(key)
    }

    /// Drops the session of a torn-down context. Returns whether one existed.
    pub fn discard(&mut self, key: &K) -> bool {
        let removed = self.sessions.remove(key).is_some();
        if removed {
            log::debug!("discarded decode session for {:?}", key);
        }
        removed
    }

    /// Drops every session.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Disassembles the instruction at `address` for context `key`.
    ///
    /// Returns `Ok(None)` when the feature is disabled or the instruction is
    /// not in the catalog; either way the caller falls back to its default
    /// decoder.
    pub fn disassemble(
        &mut self,
        key: K,
        annex: Option<&mut dyn AnnexReader>,
        memory: &dyn MemoryReader,
        address: u64,
        xlen: Xlen,
    ) -> Result<Option<DecodedInstruction>, DecodeError> {
        if !self.settings.enabled {
            return Ok(None);
        }
        self.session(key, annex)
            .disassembler(xlen)
            .disassemble_at(memory, address)
    }
}

impl<K: Eq + Hash + Debug> Default for SessionCache<K> {
    fn default() -> Self {
        Self::new(DisplaySettings::default())
    }
}
