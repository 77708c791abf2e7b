//! Output switch capability.
//!
//! The model notifies its owner of every Off/On transition through an
//! [`OutputSwitch`]. The call is synchronous, from inside `update`, after
//! the new state has been committed. Implementations must not block.

/// Receiver of output transitions (`true` = now outputting).
pub trait OutputSwitch {
    fn set_output(&mut self, on: bool);
}

impl<F> OutputSwitch for F
where
    F: FnMut(bool),
{
    #[inline]
    fn set_output(&mut self, on: bool) {
        self(on)
    }
}
