use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use uuid::Uuid;

use crate::economy::{
    len_encode_size, read_len, write_len, Currency, Group, GroupId, Groups, Player, Rate,
    RateTable, MAX_SNAPSHOT_PLAYERS, SNAPSHOT_VERSION,
};

/// Opaque identifier of one connected session (and so of its player).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u128> for SessionId {
    fn from(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Write for SessionId {
    fn write(&self, writer: &mut impl BufMut) {
        self.0.as_u128().write(writer);
    }
}

impl Read for SessionId {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self(Uuid::from_u128(u128::read(reader)?)))
    }
}

impl EncodeSize for SessionId {
    fn encode_size(&self) -> usize {
        self.0.as_u128().encode_size()
    }
}

/// A state-changing command issued by one session.
///
/// JSON: `{"type":"selectGroup","group":"A"}`, `{"type":"click"}`,
/// `{"type":"trade","from":"Common","to":"A","amount":5}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Instruction {
    /// Join a group. First write wins.
    SelectGroup { group: GroupId },

    /// Accrue one unit for the player and their group.
    Click,

    /// Exchange `amount` of `from` into `to`. Signed so that non-positive
    /// amounts reach the engine and are rejected there.
    Trade {
        from: Currency,
        to: Currency,
        amount: i64,
    },
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectGroup { .. } => "selectGroup",
            Self::Click => "click",
            Self::Trade { .. } => "trade",
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Key {
    Player(SessionId),
    Group(GroupId),
    Rates,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Player(Player),
    Group(Group),
    Rates(RateTable),
}

/// Outcome of a successfully applied instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    PlayerJoined {
        session: SessionId,
    },
    PlayerLeft {
        session: SessionId,
    },
    GroupSelected {
        session: SessionId,
        group: GroupId,
    },
    Clicked {
        session: SessionId,
        group: GroupId,
        total_wealth: u64,
    },
    Traded {
        session: SessionId,
        from: Currency,
        to: Currency,
        amount: u64,
        received: u64,
        /// Rate of the traded group after drift; `None` for group-to-group trades.
        rate_after: Option<Rate>,
    },
}

/// Result of one instruction inside a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Events(Vec<Event>),
    Rejected { instruction: Instruction, message: String },
}

/// Full economy state: the shared groups and rates plus every live player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub groups: Groups,
    pub rates: RateTable,
    pub players: BTreeMap<SessionId, Player>,
}

impl Snapshot {
    /// Keep groups and rates, forget players (sessions do not survive a restart).
    pub fn shared_only(self) -> Self {
        Self {
            groups: self.groups,
            rates: self.rates,
            players: BTreeMap::new(),
        }
    }
}

impl Write for Snapshot {
    fn write(&self, writer: &mut impl BufMut) {
        SNAPSHOT_VERSION.write(writer);
        self.groups.write(writer);
        self.rates.write(writer);
        write_len(self.players.len(), writer);
        for (session, player) in &self.players {
            session.write(writer);
            player.write(writer);
        }
    }
}

impl Read for Snapshot {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let version = u8::read(reader)?;
        if version != SNAPSHOT_VERSION {
            return Err(Error::Invalid("Snapshot", "unsupported version"));
        }
        let groups = Groups::read(reader)?;
        let rates = RateTable::read(reader)?;
        let count = read_len(reader, MAX_SNAPSHOT_PLAYERS)?;
        let mut players = BTreeMap::new();
        for _ in 0..count {
            let session = SessionId::read(reader)?;
            let player = Player::read(reader)?;
            if players.insert(session, player).is_some() {
                return Err(Error::Invalid("Snapshot", "duplicate session"));
            }
        }

        Ok(Self {
            groups,
            rates,
            players,
        })
    }
}

impl EncodeSize for Snapshot {
    fn encode_size(&self) -> usize {
        SNAPSHOT_VERSION.encode_size()
            + self.groups.encode_size()
            + self.rates.encode_size()
            + len_encode_size()
            + self
                .players
                .iter()
                .map(|(session, player)| session.encode_size() + player.encode_size())
                .sum::<usize>()
    }
}
