//! Per-resource facades layered on the [`DepApi`] capability.
//!
//! Each facade is an extension trait with default methods and a blanket implementation, so any
//! [`DepApi`] (normally [`Client`](crate::client::Client)) gains the calls once the trait is in
//! scope. Facades only know paths, methods, and JSON shapes.

pub mod account;
pub mod device;
pub mod options;
pub mod profile;

pub use account::*;
pub use device::*;
pub use options::*;
pub use profile::*;

pub use crate::client::DepApi;
