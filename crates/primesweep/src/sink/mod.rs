mod batch;
mod immediate;
mod interface;

pub use batch::*;
pub use immediate::*;
pub use interface::*;
