mod codec;
mod constants;
mod group;
mod player;
mod rates;

pub use codec::{len_encode_size, read_len, write_len};
pub use constants::*;
pub use group::*;
pub use player::*;
pub use rates::*;

#[cfg(test)]
mod tests;
