pub mod area;
pub mod reducer;

pub use area::*;
pub use reducer::*;
