pub mod pipeline;
pub mod redraw;

pub use pipeline::{
    build_lamp, build_lamp_from_json, build_lamp_with_overrides, AssemblyError, LampAssembly,
    BASE_NAME, SHADE_NAME,
};
pub use redraw::RedrawGuard;
