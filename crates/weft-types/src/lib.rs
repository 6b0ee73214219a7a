pub mod chunk;
pub mod message;
pub mod part;
pub mod usage;

pub use chunk::*;
pub use message::*;
pub use part::*;
pub use usage::*;
