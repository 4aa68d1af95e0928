//! Target host enumeration

pub mod enumerator;
pub mod ports;

pub use enumerator::HostEnumerator;
pub use ports::{HostDirectory, HostQuery};
