pub mod enums;
pub mod observation;
pub mod report;

pub use observation::*;
pub use report::*;
