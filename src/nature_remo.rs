mod client;
mod device;
mod error;

pub use client::*;
pub use device::*;
pub use error::*;
