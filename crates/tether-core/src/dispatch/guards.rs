//! # RAII Guards for Session Flags
//!
//! The dispatcher temporarily overrides two pieces of session state: the
//! waiting flag while a connected wait is in flight, and the execution mode
//! while a synchronous stop waits for its thread. [`FlagGuard`] restores the
//! previous value when dropped, so an error returned with `?` (or a panic
//! unwinding through the wait) cannot leave either flag stuck.
//!
//! [`NonStopOverride`] does the same for the execution mode but holds the whole
//! [`Dispatcher`], so the overridden dispatcher can still be used (it derefs to
//! it) while the override is active.

use std::ops::{Deref, DerefMut};

use super::Dispatcher;

/// RAII guard that overrides a `bool` and restores it on drop.
pub(crate) struct FlagGuard<'a>
{
    flag: &'a mut bool,
    previous: bool,
}

impl<'a> FlagGuard<'a>
{
    /// Set `*flag = value`, remembering the old value.
    pub(crate) fn set(flag: &'a mut bool, value: bool) -> Self
    {
        let previous = std::mem::replace(flag, value);
        Self { flag, previous }
    }
}

impl Drop for FlagGuard<'_>
{
    fn drop(&mut self)
    {
        *self.flag = self.previous;
    }
}

/// RAII guard that forces the dispatcher's execution mode and restores it on drop.
pub(crate) struct NonStopOverride<'a>
{
    dispatcher: &'a mut Dispatcher,
    previous: bool,
}

impl<'a> NonStopOverride<'a>
{
    /// Force `dispatcher` into `non_stop` mode until the guard is dropped.
    pub(crate) fn new(dispatcher: &'a mut Dispatcher, non_stop: bool) -> Self
    {
        let previous = std::mem::replace(&mut dispatcher.non_stop, non_stop);
        Self { dispatcher, previous }
    }
}

impl Deref for NonStopOverride<'_>
{
    type Target = Dispatcher;

    fn deref(&self) -> &Self::Target
    {
        self.dispatcher
    }
}

impl DerefMut for NonStopOverride<'_>
{
    fn deref_mut(&mut self) -> &mut Self::Target
    {
        self.dispatcher
    }
}

impl Drop for NonStopOverride<'_>
{
    fn drop(&mut self)
    {
        self.dispatcher.non_stop = self.previous;
    }
}
