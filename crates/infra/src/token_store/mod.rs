//! Bearer token persistence

mod file;

pub use file::FileTokenStore;
