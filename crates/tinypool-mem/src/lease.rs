//! Scoped handle for a checked-out pool value.
//!
//! A [`Lease`] returns its value to the originating pool exactly once: on
//! the first call to [`Lease::release`] or when it is dropped, whichever
//! comes first. Dropping is the normal path; explicit release exists for
//! callers that want the value back in the pool before the handle goes out
//! of scope.
//!
//! # Misuse
//!
//! The lease only guards its *own* view of the value. Anything that outlives
//! the lease and still points into the value (a cloned `Arc` the value
//! shares, an index, a raw pointer) aliases an instance the pool may already
//! have handed to another caller. The pool cannot detect that.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::pool::PoolInner;

pub struct Lease<T> {
    value: Option<T>,
    pool: Arc<PoolInner<T>>,
}

impl<T> Lease<T> {
    pub(crate) fn new(value: T, pool: Arc<PoolInner<T>>) -> Self {
        Self {
            value: Some(value),
            pool,
        }
    }

    /// Borrow the leased value.
    ///
    /// Fails with [`Error::InvalidState`] once the lease has been released.
    pub fn value(&self) -> Result<&T> {
        self.value.as_ref().ok_or_else(used_after_release::<T>)
    }

    /// Mutably borrow the leased value.
    pub fn value_mut(&mut self) -> Result<&mut T> {
        self.value.as_mut().ok_or_else(used_after_release::<T>)
    }

    /// Run `f` against the leased value.
    pub fn with<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        self.value_mut().map(f)
    }

    pub fn is_released(&self) -> bool {
        self.value.is_none()
    }

    /// Hand the value back to its pool. Calling this again is a no-op.
    ///
    /// Takes `&mut self`, so no borrow obtained from [`Lease::value`] can be
    /// alive while the value is being returned.
    pub fn release(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.return_object(value);
        }
    }
}

fn used_after_release<T>() -> Error {
    Error::InvalidState(format!(
        "Lease<{}> used after release",
        std::any::type_name::<T>()
    ))
}

impl<T> Drop for Lease<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: fmt::Debug> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease").field("value", &self.value).finish()
    }
}
