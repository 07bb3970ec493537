//! In-memory backend and collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;

use tether_core::hooks::AgentHooks;
use tether_core::{Address, Backend, NonStopOps, ResumeRequest, TargetError, TargetId, TargetResult, WaitOptions, WaitStatus};

pub const MEMORY_BASE: u64 = 0x1000;
pub const MEMORY_SIZE: usize = 0x100;

/// Everything the simulated target records, shared with the test body.
#[derive(Debug)]
pub struct SimState
{
    pub memory: Vec<u8>,
    pub waits: VecDeque<Result<(TargetId, WaitStatus), String>>,
    pub wait_calls: Vec<(TargetId, WaitOptions, bool)>,
    pub resumes: Vec<ResumeRequest>,
    pub fail_resume: bool,
    pub events: Vec<String>,
    pub non_stop_enabled: bool,
    pub fail_non_stop: bool,
    pub dropped: bool,
}

impl Default for SimState
{
    fn default() -> Self
    {
        Self {
            memory: (0..MEMORY_SIZE).map(|i| i as u8).collect(),
            waits: VecDeque::new(),
            wait_calls: Vec::new(),
            resumes: Vec::new(),
            fail_resume: false,
            events: Vec::new(),
            non_stop_enabled: false,
            fail_non_stop: false,
            dropped: false,
        }
    }
}

impl SimState
{
    fn range(&self, addr: Address, len: usize) -> Option<std::ops::Range<usize>>
    {
        let start = usize::try_from(addr.offset_from(Address::from(MEMORY_BASE))?).ok()?;
        let end = start.checked_add(len)?;
        (end <= self.memory.len()).then_some(start..end)
    }

    pub fn byte_at(&self, addr: u64) -> u8
    {
        self.memory[(addr - MEMORY_BASE) as usize]
    }
}

pub type SharedState = Rc<RefCell<SimState>>;

/// Simulated backend over a flat memory window.
pub struct SimBackend
{
    state: SharedState,
    non_stop: Option<SimNonStop>,
}

struct SimNonStop
{
    state: SharedState,
}

impl NonStopOps for SimNonStop
{
    fn start_non_stop(&mut self, enable: bool) -> TargetResult<()>
    {
        let mut state = self.state.borrow_mut();
        if state.fail_non_stop {
            return Err(TargetError::NonStopFailed("simulated failure".to_string()));
        }
        state.non_stop_enabled = enable;
        Ok(())
    }
}

impl SimBackend
{
    /// Backend without non-stop support.
    pub fn new() -> (Box<dyn Backend>, SharedState)
    {
        let state = SharedState::default();
        let backend = SimBackend {
            state: Rc::clone(&state),
            non_stop: None,
        };
        (Box::new(backend), state)
    }

    /// Backend exposing the non-stop capability.
    pub fn with_non_stop() -> (Box<dyn Backend>, SharedState)
    {
        let state = SharedState::default();
        let backend = SimBackend {
            state: Rc::clone(&state),
            non_stop: Some(SimNonStop { state: Rc::clone(&state) }),
        };
        (Box::new(backend), state)
    }
}

impl Drop for SimBackend
{
    fn drop(&mut self)
    {
        self.state.borrow_mut().dropped = true;
    }
}

impl Backend for SimBackend
{
    fn name(&self) -> &str
    {
        "sim"
    }

    fn read_memory(&mut self, addr: Address, buf: &mut [u8]) -> TargetResult<()>
    {
        let state = self.state.borrow();
        let range = state.range(addr, buf.len()).ok_or(TargetError::MemoryFault {
            address: addr,
            length: buf.len(),
        })?;
        buf.copy_from_slice(&state.memory[range]);
        Ok(())
    }

    fn write_memory(&mut self, addr: Address, data: &[u8]) -> TargetResult<()>
    {
        let mut state = self.state.borrow_mut();
        let range = state.range(addr, data.len()).ok_or(TargetError::MemoryFault {
            address: addr,
            length: data.len(),
        })?;
        state.memory[range].copy_from_slice(data);
        Ok(())
    }

    fn wait(&mut self, target: TargetId, options: WaitOptions, non_stop: bool) -> TargetResult<(TargetId, WaitStatus)>
    {
        let mut state = self.state.borrow_mut();
        state.wait_calls.push((target, options, non_stop));
        match state.waits.pop_front() {
            Some(Ok(event)) => Ok(event),
            Some(Err(reason)) => Err(TargetError::WaitFailed(reason)),
            None => Ok((target, WaitStatus::Ignore)),
        }
    }

    fn resume(&mut self, requests: &[ResumeRequest]) -> TargetResult<()>
    {
        let mut state = self.state.borrow_mut();
        if state.fail_resume {
            return Err(TargetError::ResumeFailed("simulated failure".to_string()));
        }
        state.resumes.extend_from_slice(requests);
        Ok(())
    }

    fn kill(&mut self, pid: i32) -> TargetResult<()>
    {
        let mut state = self.state.borrow_mut();
        state.events.push(format!("kill {pid}"));
        if pid == 0 {
            return Err(TargetError::KillFailed {
                pid,
                reason: "no such process".to_string(),
            });
        }
        Ok(())
    }

    fn non_stop(&mut self) -> Option<&mut dyn NonStopOps>
    {
        self.non_stop.as_mut().map(|ops| ops as &mut dyn NonStopOps)
    }
}

/// Agent hook recording into the simulator's event log.
pub struct RecordingAgent(pub SharedState);

impl AgentHooks for RecordingAgent
{
    fn notify_process_closing(&mut self, pid: i32)
    {
        self.0.borrow_mut().events.push(format!("closing {pid}"));
    }
}

/// Diagnostic sink the test can read back.
#[derive(Clone, Default)]
pub struct SharedSink(pub Rc<RefCell<Vec<u8>>>);

impl SharedSink
{
    pub fn contents(&self) -> String
    {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedSink
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>
    {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}
