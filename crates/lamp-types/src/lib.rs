pub mod normalize;
pub mod params;
pub mod variants;

pub use normalize::normalize;
pub use params::*;
pub use variants::*;
