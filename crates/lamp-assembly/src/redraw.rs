use std::ops::{Deref, DerefMut};

use lamp_kernel::Kernel;
use tracing::debug;

/// Suspends host redraw while alive and restores it on drop, however the
/// holder exits.
///
/// Derefs to the kernel so the whole build runs through the guard.
pub struct RedrawGuard<'k> {
    kernel: &'k mut dyn Kernel,
}

impl<'k> RedrawGuard<'k> {
    pub fn suspend(kernel: &'k mut dyn Kernel) -> Self {
        kernel.set_redraw(false);
        debug!("redraw suspended");
        Self { kernel }
    }
}

impl<'k> Deref for RedrawGuard<'k> {
    type Target = dyn Kernel + 'k;

    fn deref(&self) -> &Self::Target {
        &*self.kernel
    }
}

impl<'k> DerefMut for RedrawGuard<'k> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.kernel
    }
}

impl Drop for RedrawGuard<'_> {
    fn drop(&mut self) {
        self.kernel.set_redraw(true);
        debug!("redraw restored");
    }
}
