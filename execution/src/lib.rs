pub mod economy;
pub mod pricing;
pub mod state_transition;
pub mod store;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod error;
mod layer;
mod state;

pub use economy::{apply_click, select_group, trade, Settlement};
pub use error::EconomyError;
pub use layer::Layer;
pub use pricing::{drift, multiplier, quote};
pub use state::{load_groups, load_player, load_rates, Memory, State, Status};
pub use store::{decode_snapshot, encode_snapshot, FileStore, Store, StoreError};
