//! Tests for the memory access façade

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{SimBackend, MEMORY_BASE};
use tether_core::{Address, Dispatcher, SessionConfig, ShadowTable, TargetError};

const INT3: u8 = 0xcc;

fn dispatcher_with_shadows() -> (Dispatcher, common::SharedState, Rc<RefCell<ShadowTable>>)
{
    let shadows = Rc::new(RefCell::new(ShadowTable::new()));
    let mut dispatcher = Dispatcher::new(SessionConfig::default()).with_shadow_memory(Box::new(Rc::clone(&shadows)));
    let (backend, state) = SimBackend::new();
    dispatcher.install_backend(backend);
    (dispatcher, state, shadows)
}

/// Plant a one-byte trap at `addr` the way a breakpoint layer would.
fn plant_breakpoint(state: &common::SharedState, shadows: &Rc<RefCell<ShadowTable>>, addr: u64)
{
    let original = state.borrow().byte_at(addr);
    state.borrow_mut().memory[(addr - MEMORY_BASE) as usize] = INT3;
    shadows.borrow_mut().insert(Address::from(addr), vec![INT3], vec![original]).unwrap();
}

#[test]
fn test_read_memory_without_breakpoints()
{
    let (mut dispatcher, _state, _shadows) = dispatcher_with_shadows();
    let bytes = dispatcher.read_memory(Address::from(MEMORY_BASE + 4), 4).unwrap();
    assert_eq!(bytes, vec![4, 5, 6, 7]);
}

#[test]
fn test_read_memory_hides_trap_bytes()
{
    let (mut dispatcher, state, shadows) = dispatcher_with_shadows();
    plant_breakpoint(&state, &shadows, MEMORY_BASE + 0x10);

    // The target really contains the trap...
    assert_eq!(state.borrow().byte_at(MEMORY_BASE + 0x10), INT3);

    // ...but the debugger sees the original program bytes
    let bytes = dispatcher.read_memory(Address::from(MEMORY_BASE + 0x0e), 4).unwrap();
    assert_eq!(bytes, vec![0x0e, 0x0f, 0x10, 0x11]);
}

#[test]
fn test_read_u32_sees_patched_bytes()
{
    let (mut dispatcher, state, shadows) = dispatcher_with_shadows();
    plant_breakpoint(&state, &shadows, MEMORY_BASE + 0x21);

    let value = dispatcher.read_u32(Address::from(MEMORY_BASE + 0x20)).unwrap();
    assert_eq!(value, u32::from_ne_bytes([0x20, 0x21, 0x22, 0x23]));
}

#[test]
fn test_write_through_breakpoint_keeps_trap_and_updates_shadow()
{
    let (mut dispatcher, state, shadows) = dispatcher_with_shadows();
    let bp = MEMORY_BASE + 0x31;
    plant_breakpoint(&state, &shadows, bp);

    let data = [0xa0, 0xa1, 0xa2];
    dispatcher.write_memory(Address::from(MEMORY_BASE + 0x30), &data).unwrap();

    // The caller's buffer is untouched
    assert_eq!(data, [0xa0, 0xa1, 0xa2]);

    // Breakpoint survives in target memory, neighbours got the new bytes
    {
        let state = state.borrow();
        assert_eq!(state.byte_at(MEMORY_BASE + 0x30), 0xa0);
        assert_eq!(state.byte_at(bp), INT3);
        assert_eq!(state.byte_at(MEMORY_BASE + 0x32), 0xa2);
    }

    // Shadow now remembers the newly written byte
    assert_eq!(shadows.borrow().get(Address::from(bp)).unwrap().shadow, vec![0xa1]);

    // And a read-back shows exactly what was written
    let bytes = dispatcher.read_memory(Address::from(MEMORY_BASE + 0x30), 3).unwrap();
    assert_eq!(bytes, data.to_vec());
}

#[test]
fn test_large_write_spills_to_heap()
{
    let (mut dispatcher, state, _shadows) = dispatcher_with_shadows();
    let data: Vec<u8> = (0..64).map(|i| 0xff - i).collect();
    dispatcher.write_memory(Address::from(MEMORY_BASE), &data).unwrap();
    assert_eq!(&state.borrow().memory[..64], data.as_slice());
}

#[test]
fn test_read_fault_is_propagated()
{
    let (mut dispatcher, _state, _shadows) = dispatcher_with_shadows();
    let err = dispatcher.read_memory(Address::from(0x10), 4).unwrap_err();
    match err {
        TargetError::MemoryFault { address, length } => {
            assert_eq!(address, Address::from(0x10));
            assert_eq!(length, 4);
        }
        other => panic!("Expected MemoryFault, got {other:?}"),
    }
}

#[test]
fn test_write_fault_then_success()
{
    let (mut dispatcher, state, _shadows) = dispatcher_with_shadows();
    assert!(dispatcher.write_memory(Address::from(0x10), &[1, 2, 3]).is_err());

    // A failed write leaves nothing behind that disturbs the next one
    dispatcher.write_memory(Address::from(MEMORY_BASE), &[9]).unwrap();
    assert_eq!(state.borrow().byte_at(MEMORY_BASE), 9);
}

#[test]
fn test_memory_access_requires_backend()
{
    let mut dispatcher = Dispatcher::new(SessionConfig::default());
    assert!(matches!(dispatcher.read_memory(Address::from(MEMORY_BASE), 1), Err(TargetError::NoBackend)));
    assert!(matches!(dispatcher.write_memory(Address::from(MEMORY_BASE), &[0]), Err(TargetError::NoBackend)));
}

#[test]
fn test_write_without_backend_leaves_shadow_alone()
{
    let shadows = Rc::new(RefCell::new(ShadowTable::new()));
    shadows.borrow_mut().insert(Address::from(0x40), vec![INT3], vec![0x11]).unwrap();
    let mut dispatcher = Dispatcher::new(SessionConfig::default()).with_shadow_memory(Box::new(Rc::clone(&shadows)));

    assert!(dispatcher.write_memory(Address::from(0x40), &[0x22]).is_err());
    assert_eq!(shadows.borrow().get(Address::from(0x40)).unwrap().shadow, vec![0x11]);
}
