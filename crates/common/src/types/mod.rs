//! 共享基础类型

mod address;

pub use address::{Address, AddressParseError};
