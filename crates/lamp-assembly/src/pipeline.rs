//! Top-level lamp build: normalize, base with neck and port, shade shell,
//! pattern, then naming and selection.

use lamp_kernel::{Kernel, KernelError, Solid};
use lamp_ops::{
    apply_pattern, assemble_neck_and_port, build_base, build_shade, OpError, PatternContext,
};
use lamp_types::{normalize, LampParams, ParamError};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::redraw::RedrawGuard;

/// Display name of the finished base.
pub const BASE_NAME: &str = "Lamp_Base";
/// Display name of the finished shade.
pub const SHADE_NAME: &str = "Lamp_Shade";

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("modeling operation failed: {0}")]
    Op(#[from] OpError),
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),
}

/// Result of a lamp build.
///
/// Either solid may be `None` when the kernel produced nothing for it; the
/// run itself still succeeded.
#[derive(Debug)]
pub struct LampAssembly {
    /// Base with neck and port, named [`BASE_NAME`] and selected.
    pub base: Option<Solid>,
    /// Patterned shade, named [`SHADE_NAME`].
    pub shade: Option<Solid>,
    /// The parameters after normalization.
    pub params: LampParams,
    pub port_radius: f64,
    /// Height at which the shade sits.
    pub base_height: f64,
}

/// Build the lamp described by `params` in `kernel`.
///
/// Redraw is suspended for the whole run. Only the two output solids remain
/// in the kernel afterwards.
#[instrument(skip_all)]
pub fn build_lamp(kernel: &mut dyn Kernel, params: LampParams) -> Result<LampAssembly, AssemblyError> {
    let mut guard = RedrawGuard::suspend(kernel);
    run(&mut *guard, params)
}

/// Build from a JSON object of parameter overrides.
pub fn build_lamp_from_json(kernel: &mut dyn Kernel, json: &str) -> Result<LampAssembly, AssemblyError> {
    let params = LampParams::from_json(json)?;
    build_lamp(kernel, params)
}

/// Build from already-parsed parameter overrides.
pub fn build_lamp_with_overrides(
    kernel: &mut dyn Kernel,
    overrides: Value,
) -> Result<LampAssembly, AssemblyError> {
    let params = LampParams::with_overrides(overrides)?;
    build_lamp(kernel, params)
}

fn run(kernel: &mut dyn Kernel, mut params: LampParams) -> Result<LampAssembly, AssemblyError> {
    let port_radius = normalize(&mut params);

    let base = build_base(kernel, &params)?;
    let base = assemble_neck_and_port(kernel, base, &params, port_radius)?;
    let base_height = base.height;
    if let Some(solid) = &base.solid {
        kernel.set_name(solid, BASE_NAME)?;
    }

    let mut shell = build_shade(kernel, &params, base_height)?;
    let shade = shell.solid.take();
    let patterned = apply_pattern(
        kernel,
        shade,
        &PatternContext::for_shell(&params, base_height, &shell),
    );
    // Released even when the pattern stage faulted.
    if let Some(surface) = shell.pattern_surface.take() {
        kernel.delete_surface(surface);
    }
    let shade = patterned?;
    match &shade {
        Some(solid) => kernel.set_name(solid, SHADE_NAME)?,
        None => warn!("shade is null"),
    }

    match &base.solid {
        Some(solid) => kernel.select(solid)?,
        None => warn!("base is null"),
    }
    info!(
        base = base.solid.is_some(),
        shade = shade.is_some(),
        base_height,
        port_radius,
        "lamp built"
    );

    Ok(LampAssembly {
        base: base.solid,
        shade,
        params,
        port_radius,
        base_height,
    })
}
