use lamp_kernel::{Kernel, OrNull};
use lamp_types::LampParams;
use tracing::{debug, instrument};

use crate::boolean::{safe_difference, safe_union};
use crate::types::{BaseBody, OpError};

/// How far the port bore overshoots the bottom of the base.
const PORT_UNDERSHOOT: f64 = 2.0;
/// How far the port bore overshoots the top of the neck.
const PORT_OVERSHOOT: f64 = 5.0;

/// Fuse the neck ring onto the top of the base and bore the cord port
/// through both.
///
/// A null base keeps the neck on its own; a null union yields a null body.
#[instrument(skip_all, fields(base_height = base.height, port_radius = port_radius))]
pub fn assemble_neck_and_port(
    kernel: &mut dyn Kernel,
    base: BaseBody,
    params: &LampParams,
    port_radius: f64,
) -> Result<BaseBody, OpError> {
    let height = base.height;

    let neck = kernel
        .add_cylinder(
            [0.0, 0.0, height],
            params.neck_height,
            params.neck_outer_radius,
            true,
        )
        .or_null()?;
    let body = safe_union(kernel, vec![base.solid, neck])?;

    let bottom = -PORT_UNDERSHOOT;
    let top = height + params.neck_height + PORT_OVERSHOOT;
    debug!(bottom, top, "port bore");
    let port = kernel
        .add_cylinder([0.0, 0.0, bottom], top - bottom, port_radius, true)
        .or_null()?;
    let solid = safe_difference(kernel, body, vec![port])?;

    Ok(BaseBody { solid, height })
}
