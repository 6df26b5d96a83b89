pub mod base;
pub mod boolean;
pub mod neck;
pub mod pattern;
pub mod profiles;
pub mod shade;
pub mod types;

pub use base::build_base;
pub use boolean::{safe_difference, safe_union};
pub use neck::assemble_neck_and_port;
pub use pattern::{apply_pattern, generate_cutters, PatternContext};
pub use shade::build_shade;
pub use types::*;
