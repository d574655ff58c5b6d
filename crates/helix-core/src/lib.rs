pub mod annotation;
pub mod error;
pub mod numbering;
pub mod regions;
pub mod scheme;
pub mod sequence;

pub use annotation::*;
pub use error::NumberingError;
pub use numbering::*;
pub use scheme::*;
pub use sequence::*;
