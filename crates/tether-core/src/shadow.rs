//! Software-breakpoint shadow bookkeeping.
//!
//! A [`ShadowTable`] remembers, for every inserted software breakpoint, the
//! trap bytes written into the target and the original program bytes they
//! replaced (the "shadow"). It implements [`ShadowMemory`] so it can be plugged
//! straight into a [`Dispatcher`](crate::Dispatcher). The table only records
//! breakpoints; deciding where they go and writing the traps is up to the
//! breakpoint layer above.

use std::collections::HashMap;
use std::time::SystemTime;

use tracing::trace;

use crate::error::{TargetError, TargetResult};
use crate::hooks::ShadowMemory;
use crate::types::Address;

/// Unique identifier for a shadow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShadowId(u64);

impl ShadowId
{
    /// Get the raw numeric representation (useful for logging / errors).
    #[must_use]
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

/// One inserted software breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRecord
{
    /// Identifier assigned on insertion.
    pub id: ShadowId,
    /// First byte covered by the breakpoint.
    pub address: Address,
    /// Trap instruction bytes as written into the target.
    pub trap: Vec<u8>,
    /// Original program bytes the trap replaced.
    pub shadow: Vec<u8>,
    /// Timestamp of insertion.
    pub inserted_at: SystemTime,
}

impl ShadowRecord
{
    /// Index into this record for target address `addr`, if covered.
    fn index_of(&self, addr: Address) -> Option<usize>
    {
        let offset = usize::try_from(addr.offset_from(self.address)?).ok()?;
        (offset < self.trap.len()).then_some(offset)
    }

    /// `true` if `[addr, addr + len)` shares at least one byte with this record.
    fn intersects(&self, addr: Address, len: usize) -> bool
    {
        let start = u128::from(self.address.value());
        let other = u128::from(addr.value());
        other < start + self.trap.len() as u128 && start < other + len as u128
    }

    /// Overlap between this record and `[addr, addr + len)` as
    /// `(record_index, buffer_index)` pairs.
    fn overlap(&self, addr: Address, len: usize) -> impl Iterator<Item = (usize, usize)> + '_
    {
        (0..self.trap.len()).filter_map(move |i| {
            let byte_addr = self.address.checked_add(i as u64)?;
            let buf_index = usize::try_from(byte_addr.offset_from(addr)?).ok()?;
            (buf_index < len).then_some((i, buf_index))
        })
    }
}

/// Table of inserted software breakpoints keyed by address.
#[derive(Debug, Default)]
pub struct ShadowTable
{
    next_id: u64,
    by_address: HashMap<Address, ShadowRecord>,
}

impl ShadowTable
{
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    fn allocate_id(&mut self) -> ShadowId
    {
        self.next_id = self.next_id.wrapping_add(1);
        ShadowId(self.next_id)
    }

    /// Record a breakpoint at `address`.
    ///
    /// `trap` is what the breakpoint layer wrote into the target, `shadow` what
    /// was there before. Inserting at an address that already has a record
    /// replaces it. Records never share a byte, so every byte in the target
    /// belongs to at most one breakpoint.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if `trap` and `shadow` differ in length, are
    /// empty, the covered range wraps around the address space, or the range
    /// overlaps a record starting at a different address.
    pub fn insert(&mut self, address: Address, trap: Vec<u8>, shadow: Vec<u8>) -> TargetResult<ShadowId>
    {
        if trap.is_empty() || trap.len() != shadow.len() {
            return Err(TargetError::InvalidArgument(format!(
                "trap ({} bytes) and shadow ({} bytes) must be the same non-zero length",
                trap.len(),
                shadow.len()
            )));
        }
        if address.checked_add(trap.len() as u64 - 1).is_none() {
            return Err(TargetError::InvalidArgument(format!("breakpoint at {address} wraps the address space")));
        }

        if let Some(other) = self
            .by_address
            .values()
            .find(|record| record.address != address && record.intersects(address, trap.len()))
        {
            return Err(TargetError::InvalidArgument(format!(
                "breakpoint at {address} overlaps the one at {}",
                other.address
            )));
        }

        let id = self.allocate_id();
        self.by_address.insert(
            address,
            ShadowRecord {
                id,
                address,
                trap,
                shadow,
                inserted_at: SystemTime::now(),
            },
        );
        Ok(id)
    }

    /// Remove the record at `address`, returning it if it was present.
    pub fn remove(&mut self, address: Address) -> Option<ShadowRecord>
    {
        self.by_address.remove(&address)
    }

    /// Record starting at `address`.
    pub fn get(&self, address: Address) -> Option<&ShadowRecord>
    {
        self.by_address.get(&address)
    }

    /// Record covering `address` (not necessarily starting there).
    pub fn covering(&self, address: Address) -> Option<&ShadowRecord>
    {
        self.by_address.values().find(|record| record.index_of(address).is_some())
    }

    /// Number of records.
    pub fn len(&self) -> usize
    {
        self.by_address.len()
    }

    /// `true` if no breakpoints are recorded.
    pub fn is_empty(&self) -> bool
    {
        self.by_address.is_empty()
    }

    /// Iterate over all records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ShadowRecord>
    {
        self.by_address.values()
    }
}

impl ShadowMemory for ShadowTable
{
    fn on_memory_read(&mut self, addr: Address, buf: &mut [u8])
    {
        let len = buf.len();
        for record in self.by_address.values() {
            for (i, buf_index) in record.overlap(addr, len) {
                trace!(address = %record.address, offset = i, "restoring shadowed byte on read");
                buf[buf_index] = record.shadow[i];
            }
        }
    }

    fn on_memory_write(&mut self, addr: Address, new_bytes: &mut [u8], original: &[u8])
    {
        let len = new_bytes.len().min(original.len());
        for record in self.by_address.values_mut() {
            let hits: Vec<(usize, usize)> = record.overlap(addr, len).collect();
            for (i, buf_index) in hits {
                trace!(address = %record.address, offset = i, "updating shadow and keeping trap on write");
                record.shadow[i] = original[buf_index];
                new_bytes[buf_index] = record.trap[i];
            }
        }
    }
}
