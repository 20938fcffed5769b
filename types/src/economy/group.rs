use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

/// One of the four fixed groups a player can join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupId {
    A,
    B,
    C,
    D,
}

impl GroupId {
    pub const ALL: [GroupId; 4] = [GroupId::A, GroupId::B, GroupId::C, GroupId::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupId::A => "A",
            GroupId::B => "B",
            GroupId::C => "C",
            GroupId::D => "D",
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupId {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(GroupId::A),
            "B" => Ok(GroupId::B),
            "C" => Ok(GroupId::C),
            "D" => Ok(GroupId::D),
            other => Err(ParseCurrencyError(other.to_string())),
        }
    }
}

impl Write for GroupId {
    fn write(&self, writer: &mut impl BufMut) {
        let tag: u8 = match self {
            GroupId::A => 0,
            GroupId::B => 1,
            GroupId::C => 2,
            GroupId::D => 3,
        };
        tag.write(writer);
    }
}

impl Read for GroupId {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            0 => Ok(GroupId::A),
            1 => Ok(GroupId::B),
            2 => Ok(GroupId::C),
            3 => Ok(GroupId::D),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for GroupId {
    const SIZE: usize = u8::SIZE;
}

/// Unknown currency or group name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCurrencyError(pub String);

impl fmt::Display for ParseCurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown currency: {}", self.0)
    }
}

impl std::error::Error for ParseCurrencyError {}

/// Either the shared common currency or a group-local one.
///
/// Serialized as `"Common"` or the group letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Common,
    Group(GroupId),
}

impl Currency {
    pub fn group(&self) -> Option<GroupId> {
        match self {
            Currency::Common => None,
            Currency::Group(group) => Some(*group),
        }
    }
}

impl From<GroupId> for Currency {
    fn from(group: GroupId) -> Self {
        Currency::Group(group)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Common => f.write_str("Common"),
            Currency::Group(group) => group.fmt(f),
        }
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Common" {
            return Ok(Currency::Common);
        }
        s.parse().map(Currency::Group)
    }
}

impl TryFrom<String> for Currency {
    type Error = ParseCurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.to_string()
    }
}

/// One value per group, serialized as `{"A": .., "B": .., "C": .., "D": ..}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerGroup<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
    #[serde(rename = "C")]
    pub c: T,
    #[serde(rename = "D")]
    pub d: T,
}

impl<T> PerGroup<T> {
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &T)> {
        GroupId::ALL.into_iter().map(move |group| (group, &self[group]))
    }
}

impl<T> Index<GroupId> for PerGroup<T> {
    type Output = T;

    fn index(&self, group: GroupId) -> &T {
        match group {
            GroupId::A => &self.a,
            GroupId::B => &self.b,
            GroupId::C => &self.c,
            GroupId::D => &self.d,
        }
    }
}

impl<T> IndexMut<GroupId> for PerGroup<T> {
    fn index_mut(&mut self, group: GroupId) -> &mut T {
        match group {
            GroupId::A => &mut self.a,
            GroupId::B => &mut self.b,
            GroupId::C => &mut self.c,
            GroupId::D => &mut self.d,
        }
    }
}

impl<T: Write> Write for PerGroup<T> {
    fn write(&self, writer: &mut impl BufMut) {
        self.a.write(writer);
        self.b.write(writer);
        self.c.write(writer);
        self.d.write(writer);
    }
}

impl<T: Read<Cfg = ()>> Read for PerGroup<T> {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            a: T::read_cfg(reader, &())?,
            b: T::read_cfg(reader, &())?,
            c: T::read_cfg(reader, &())?,
            d: T::read_cfg(reader, &())?,
        })
    }
}

impl<T: EncodeSize> EncodeSize for PerGroup<T> {
    fn encode_size(&self) -> usize {
        self.a.encode_size() + self.b.encode_size() + self.c.encode_size() + self.d.encode_size()
    }
}

/// Aggregate wealth of everyone who joined a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub total_wealth: u64,
}

impl Write for Group {
    fn write(&self, writer: &mut impl BufMut) {
        self.total_wealth.write(writer);
    }
}

impl Read for Group {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            total_wealth: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Group {
    fn encode_size(&self) -> usize {
        self.total_wealth.encode_size()
    }
}

/// The four groups of one economy.
pub type Groups = PerGroup<Group>;
