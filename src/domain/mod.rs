pub mod billing;
pub mod invoice;
pub mod region;
pub mod solar;

pub use billing::*;
pub use invoice::*;
pub use region::*;
pub use solar::*;
