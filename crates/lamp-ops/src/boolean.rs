use lamp_kernel::{Kernel, OrNull, Solid};
use tracing::debug;

use crate::types::OpError;

/// Union of every non-null operand.
///
/// No operands yields `None`; a single operand is returned untouched.
pub fn safe_union(
    kernel: &mut dyn Kernel,
    operands: Vec<Option<Solid>>,
) -> Result<Option<Solid>, OpError> {
    let mut solids: Vec<Solid> = operands.into_iter().flatten().collect();
    match solids.len() {
        0 => Ok(None),
        1 => Ok(solids.pop()),
        n => {
            debug!(operands = n, "boolean union");
            Ok(kernel.boolean_union(solids).or_null()?)
        }
    }
}

/// `target` minus every non-null cutter.
///
/// A null target yields `None` (and the cutters are released); an empty
/// cutter list returns the target unchanged.
pub fn safe_difference(
    kernel: &mut dyn Kernel,
    target: Option<Solid>,
    cutters: Vec<Option<Solid>>,
) -> Result<Option<Solid>, OpError> {
    let cutters: Vec<Solid> = cutters.into_iter().flatten().collect();
    let Some(target) = target else {
        for cutter in cutters {
            kernel.delete_solid(cutter);
        }
        return Ok(None);
    };
    if cutters.is_empty() {
        return Ok(Some(target));
    }
    debug!(cutters = cutters.len(), "boolean difference");
    Ok(kernel.boolean_difference(target, cutters).or_null()?)
}
