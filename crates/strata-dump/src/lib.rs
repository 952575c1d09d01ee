pub mod chunk;
pub mod encode;
pub mod error;
pub mod format;
pub mod hash;
pub mod writer;

pub use error::DumpError;
pub use writer::{dump_to, dump_to_file, DumpOptions};
