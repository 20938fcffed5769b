use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};

use super::{Currency, GroupId, PerGroup};

/// Balances of one connected player.
///
/// A player holds a balance in every group currency, not only in the group
/// they joined: trades can move value into any of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub group: Option<GroupId>,
    pub common_currency: u64,
    pub group_currencies: PerGroup<u64>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Common => self.common_currency,
            Currency::Group(group) => self.group_currencies[group],
        }
    }

    pub fn balance_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::Common => &mut self.common_currency,
            Currency::Group(group) => &mut self.group_currencies[group],
        }
    }
}

impl Write for Player {
    fn write(&self, writer: &mut impl BufMut) {
        self.group.write(writer);
        self.common_currency.write(writer);
        self.group_currencies.write(writer);
    }
}

impl Read for Player {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            group: Option::<GroupId>::read(reader)?,
            common_currency: u64::read(reader)?,
            group_currencies: PerGroup::<u64>::read(reader)?,
        })
    }
}

impl EncodeSize for Player {
    fn encode_size(&self) -> usize {
        self.group.encode_size()
            + self.common_currency.encode_size()
            + self.group_currencies.encode_size()
    }
}
