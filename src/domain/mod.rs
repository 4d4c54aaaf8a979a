mod calculator;
mod invoice;
mod money;

pub use calculator::*;
pub use invoice::*;
pub use money::*;
