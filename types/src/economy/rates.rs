use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PerGroup, INITIAL_RATE, MAX_RATE, MIN_RATE};

/// Units of common currency one unit of a group currency is worth.
///
/// Always within `[MIN_RATE, MAX_RATE]`: every constructor clamps, so drift
/// can never reach zero (which would make buying a division by zero).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Rate(u8);

impl Rate {
    pub const MIN: Rate = Rate(MIN_RATE);
    pub const MAX: Rate = Rate(MAX_RATE);

    pub fn new(value: u8) -> Self {
        Self(value.clamp(MIN_RATE, MAX_RATE))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One step up, saturating at the ceiling.
    pub fn raise(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step down, saturating at the floor.
    pub fn lower(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self(INITIAL_RATE)
    }
}

impl From<u8> for Rate {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Rate> for u8 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 : {}", self.0)
    }
}

impl Write for Rate {
    fn write(&self, writer: &mut impl BufMut) {
        self.0.write(writer);
    }
}

impl Read for Rate {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        if !(MIN_RATE..=MAX_RATE).contains(&value) {
            return Err(Error::Invalid("Rate", "out of range"));
        }
        Ok(Self(value))
    }
}

impl EncodeSize for Rate {
    fn encode_size(&self) -> usize {
        self.0.encode_size()
    }
}

/// Exchange rate of every group currency against common currency.
pub type RateTable = PerGroup<Rate>;
