pub mod security;
pub mod storage;

pub use security::*;
pub use storage::*;
