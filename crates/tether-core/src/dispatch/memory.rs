//! # Memory Access Façade
//!
//! Every memory access in the stub funnels through here: breakpoint
//! management, variable inspection, stepping. Shadow consistency is therefore
//! enforced in one place instead of by every caller:
//!
//! - **Reads** come back with software-breakpoint traps replaced by the
//!   original program bytes.
//! - **Writes** that land on a breakpoint update the breakpoint's shadow and
//!   leave the trap in the target, so the breakpoint survives.

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::Dispatcher;
use crate::error::{TargetError, TargetResult};
use crate::types::Address;

/// Inline capacity of the write copy; breakpoint-sized writes never allocate.
const INLINE_WRITE: usize = 16;

impl Dispatcher
{
    /// Read `len` bytes of target memory starting at `addr`
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `MemoryFault`: the backend could not read the range
    ///
    /// ## Example
    ///
    /// ```rust,no_run
    /// # fn demo(dispatcher: &mut tether_core::Dispatcher) -> tether_core::TargetResult<()> {
    /// use tether_core::Address;
    ///
    /// let bytes = dispatcher.read_memory(Address::from(0x401000), 4)?;
    /// // Any software breakpoint inside the range reads back as the original instruction
    /// println!("{bytes:02x?}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn read_memory(&mut self, addr: Address, len: usize) -> TargetResult<Vec<u8>>
    {
        let mut buf = vec![0; len];
        self.read_memory_into(addr, &mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` with target memory starting at `addr`
    ///
    /// In-place variant of [`read_memory`](Self::read_memory) for callers that
    /// already own a buffer.
    ///
    /// ## Errors
    ///
    /// Same as [`read_memory`](Self::read_memory).
    pub fn read_memory_into(&mut self, addr: Address, buf: &mut [u8]) -> TargetResult<()>
    {
        trace!("read_memory {} bytes at {}", buf.len(), addr);
        self.backend_mut()?.read_memory(addr, buf)?;
        self.shadow.on_memory_read(addr, buf);
        Ok(())
    }

    /// Read a 32-bit value in target (host) byte order
    ///
    /// ## Errors
    ///
    /// Same as [`read_memory`](Self::read_memory).
    pub fn read_u32(&mut self, addr: Address) -> TargetResult<u32>
    {
        let mut buf = [0u8; 4];
        self.read_memory_into(addr, &mut buf)?;
        Ok(u32::from_ne_bytes(buf))
    }

    /// Write `data` to target memory starting at `addr`
    ///
    /// The bytes are copied into a call-scoped buffer and passed through the
    /// shadow hook before reaching the backend, so the caller's slice is never
    /// modified and may be reused as soon as this returns. The copy is dropped
    /// on every exit path.
    ///
    /// ## Errors
    ///
    /// - `NoBackend`: no backend installed
    /// - `MemoryFault`: the backend could not write the range
    pub fn write_memory(&mut self, addr: Address, data: &[u8]) -> TargetResult<()>
    {
        if !self.has_backend() {
            return Err(TargetError::NoBackend);
        }
        trace!("write_memory {} bytes at {}", data.len(), addr);

        let mut buffer: SmallVec<[u8; INLINE_WRITE]> = SmallVec::from_slice(data);
        self.shadow.on_memory_write(addr, &mut buffer, data);
        if buffer.as_slice() != data {
            debug!("write at {} passes through an inserted breakpoint", addr);
        }
        self.backend_mut()?.write_memory(addr, &buffer)
    }
}
