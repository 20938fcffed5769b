use groupclick_types::{
    economy::{Group, GroupId, Groups, Player, RateTable},
    Key, SessionId, Snapshot, Value,
};
use std::collections::{BTreeMap, HashMap};

/// Key/value view of one economy.
///
/// Storage is in-process, so unlike a database-backed store every method is
/// synchronous and infallible.
pub trait State {
    fn get(&self, key: &Key) -> Option<Value>;
    fn insert(&mut self, key: Key, value: Value);
    fn delete(&mut self, key: &Key);

    fn apply(&mut self, changes: Vec<(Key, Status)>) {
        for (key, status) in changes {
            match status {
                Status::Update(value) => self.insert(key, value),
                Status::Delete => self.delete(&key),
            }
        }
    }
}

#[derive(Default)]
pub struct Memory {
    state: HashMap<Key, Value>,
}

impl Memory {
    /// Restore an economy from a snapshot, players included.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut memory = Self::default();
        for (group, value) in snapshot.groups.iter() {
            memory.insert(Key::Group(group), Value::Group(*value));
        }
        memory.insert(Key::Rates, Value::Rates(snapshot.rates));
        for (session, player) in snapshot.players {
            memory.insert(Key::Player(session), Value::Player(player));
        }
        memory
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut players = BTreeMap::new();
        for (key, value) in &self.state {
            if let (Key::Player(session), Value::Player(player)) = (key, value) {
                players.insert(*session, player.clone());
            }
        }
        Snapshot {
            groups: load_groups(self),
            rates: load_rates(self),
            players,
        }
    }

    /// Number of live players.
    pub fn players(&self) -> usize {
        self.state
            .keys()
            .filter(|key| matches!(key, Key::Player(_)))
            .count()
    }
}

impl State for Memory {
    fn get(&self, key: &Key) -> Option<Value> {
        self.state.get(key).cloned()
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.state.insert(key, value);
    }

    fn delete(&mut self, key: &Key) {
        self.state.remove(key);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Update(Value),
    Delete,
}

pub fn load_player<S: State>(state: &S, session: &SessionId) -> Option<Player> {
    match state.get(&Key::Player(*session)) {
        Some(Value::Player(player)) => Some(player),
        _ => None,
    }
}

pub fn load_group<S: State>(state: &S, group: GroupId) -> Group {
    match state.get(&Key::Group(group)) {
        Some(Value::Group(group)) => group,
        _ => Group::default(),
    }
}

pub fn load_groups<S: State>(state: &S) -> Groups {
    let mut groups = Groups::default();
    for group in GroupId::ALL {
        groups[group] = load_group(state, group);
    }
    groups
}

pub fn load_rates<S: State>(state: &S) -> RateTable {
    match state.get(&Key::Rates) {
        Some(Value::Rates(rates)) => rates,
        _ => RateTable::default(),
    }
}
