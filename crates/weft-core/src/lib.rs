pub mod id;

pub use id::Prefix;
