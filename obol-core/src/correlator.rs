//! Request correlator
//!
//! Responses arrive asynchronously and carry only the id of the request
//! that caused them. The correlator hands out ids and remembers which role
//! each outstanding id plays.

use heapless::FnvIndexMap;

use crate::portfolio::MAX_ACCOUNTS;

/// Pending table size (power of two, at least one slot per role)
pub const MAX_PENDING: usize = 16;

const _: () = assert!(MAX_PENDING >= 2 + MAX_ACCOUNTS);

/// What an outstanding request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestRole {
    BidQuery,
    AskQuery,
    /// Balance of the account at this index in the configured list
    BalanceQuery(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CorrelatorError {
    /// No free slot in the pending table
    Full,
}

#[derive(Debug, Clone)]
pub struct Correlator {
    next_id: u32,
    pending: FnvIndexMap<u32, RequestRole, MAX_PENDING>,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

impl Correlator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: FnvIndexMap::new(),
        }
    }

    /// Issue the next id: 1, 2, 3, ...
    ///
    /// Id 0 is never issued, so a missing id can never match.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }

    /// Record `id` as pending for `role`
    ///
    /// A role already in flight is superseded: its older id is dropped and a
    /// late answer to it resolves to unknown.
    pub fn register(&mut self, id: u32, role: RequestRole) -> Result<(), CorrelatorError> {
        if let Some(stale) = self.pending_id(role) {
            self.pending.remove(&stale);
        }
        self.pending
            .insert(id, role)
            .map(|_| ())
            .map_err(|_| CorrelatorError::Full)
    }

    /// `next_id` + `register`
    pub fn issue(&mut self, role: RequestRole) -> Result<u32, CorrelatorError> {
        let id = self.next_id();
        self.register(id, role)?;
        Ok(id)
    }

    /// Take the role for a response id; `None` for unknown or already resolved ids
    pub fn resolve(&mut self, id: u32) -> Option<RequestRole> {
        self.pending.remove(&id)
    }

    /// Id currently pending for `role`
    pub fn pending_id(&self, role: RequestRole) -> Option<u32> {
        self.pending
            .iter()
            .find(|(_, r)| **r == role)
            .map(|(id, _)| *id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Forget every outstanding request (connection lost)
    pub fn abandon_all(&mut self) {
        self.pending.clear();
    }
}
