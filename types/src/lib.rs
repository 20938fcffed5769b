pub mod api;
pub mod economy;
pub mod execution;

pub use execution::*;
