use lamp_kernel::{Solid, Surface};

/// A base body and the height at which the neck sits.
#[derive(Debug)]
pub struct BaseBody {
    /// `None` when the kernel produced nothing for this base.
    pub solid: Option<Solid>,
    /// Z-extent actually used by the chosen variant.
    pub height: f64,
}

/// The shade shell before any pattern is applied.
#[derive(Debug)]
pub struct ShadeShell {
    pub solid: Option<Solid>,
    /// Uncapped copy of the lofted outer surface, for surface-sampling patterns.
    /// Only the lofted form produces one; the caller must release it.
    pub pattern_surface: Option<Surface>,
    /// Outermost radius of the shell wall.
    pub outer_radius: f64,
    /// Innermost radius of the upper cavity wall.
    pub inner_radius: f64,
    /// Outer wall radius at the shade bottom.
    pub bottom_radius: f64,
    /// Outer wall radius at the rim.
    pub top_radius: f64,
}

/// Errors from modeling operations.
///
/// Empty kernel results never show up here; they propagate as `None`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] lamp_kernel::KernelError),
}
