use serde::{Deserialize, Serialize};
use tracing::warn;

/// World-space point `[x, y, z]`.
pub type Point3 = [f64; 3];

/// World-space direction `[x, y, z]`.
pub type Vector3 = [f64; 3];

/// Opaque handle to a closed body in the geometry kernel.
///
/// Not `Clone`: passing a `Solid` by value to a kernel operation hands it
/// over for good, and the kernel releases it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Solid(u64);

/// Opaque handle to an open surface (an uncapped loft, a planar profile).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Surface(u64);

/// Opaque handle to a curve used as scaffolding.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Curve(u64);

macro_rules! raw_handle {
    ($ty:ident) => {
        impl $ty {
            /// Wrap a kernel-side identifier. Only kernel implementations call this.
            pub fn from_raw(id: u64) -> Self {
                Self(id)
            }

            /// The kernel-side identifier. Valid only for the current kernel session.
            pub fn raw(&self) -> u64 {
                self.0
            }
        }
    };
}

raw_handle!(Solid);
raw_handle!(Surface);
raw_handle!(Curve);

/// Parametric direction of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceDirection {
    U,
    V,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    /// The operation produced nothing, typically for degenerate input.
    #[error("{operation} produced an empty result")]
    EmptyResult { operation: String },

    #[error("stale {kind} handle: {id}")]
    StaleHandle { kind: &'static str, id: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

impl KernelError {
    pub fn empty(operation: impl Into<String>) -> Self {
        KernelError::EmptyResult {
            operation: operation.into(),
        }
    }
}

/// Null propagation for kernel results.
///
/// An empty kernel result becomes `Ok(None)`; every other error stays an
/// error and aborts the run.
pub trait OrNull<T> {
    fn or_null(self) -> Result<Option<T>, KernelError>;
}

impl<T> OrNull<T> for Result<T, KernelError> {
    fn or_null(self) -> Result<Option<T>, KernelError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(KernelError::EmptyResult { operation }) => {
                warn!(%operation, "kernel returned nothing, propagating null");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
