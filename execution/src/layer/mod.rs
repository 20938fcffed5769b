use groupclick_types::{
    economy::Player,
    execution::{Event, Instruction, Key, Output, SessionId, Value},
};
use std::collections::BTreeMap;

use crate::{
    state::{load_player, State, Status},
    EconomyError,
};

mod handlers;

/// Staging area over a read-only [State].
///
/// Every instruction reads through the pending changes, runs against owned
/// copies of the entities it needs, and stages the results only once it has
/// succeeded. Nothing reaches the underlying state until the caller applies
/// [Layer::commit].
pub struct Layer<'a, S: State> {
    state: &'a S,
    pending: BTreeMap<Key, Status>,
}

impl<'a, S: State> Layer<'a, S> {
    pub fn new(state: &'a S) -> Self {
        Self {
            state,
            pending: BTreeMap::new(),
        }
    }

    fn load_player(&self, session: &SessionId) -> Result<Player, EconomyError> {
        load_player(self, session).ok_or(EconomyError::UnknownSession(*session))
    }

    /// Create a fresh player for `session`.
    pub fn join(&mut self, session: SessionId) -> Result<Vec<Event>, EconomyError> {
        self.handle_join(session)
    }

    /// Remove the player of `session`. Groups and rates are left as they are.
    pub fn leave(&mut self, session: SessionId) -> Result<Vec<Event>, EconomyError> {
        self.handle_leave(session)
    }

    /// Run one instruction for `session`. On error nothing is staged.
    pub fn apply(
        &mut self,
        session: SessionId,
        instruction: &Instruction,
    ) -> Result<Vec<Event>, EconomyError> {
        match instruction {
            Instruction::SelectGroup { group } => self.handle_select_group(session, *group),
            Instruction::Click => self.handle_click(session),
            Instruction::Trade { from, to, amount } => {
                self.handle_trade(session, *from, *to, *amount)
            }
        }
    }

    /// Run a batch for one session. Each instruction stands alone: a
    /// rejected one is reported and the rest still run.
    pub fn execute(&mut self, session: SessionId, instructions: Vec<Instruction>) -> Vec<Output> {
        let mut outputs = Vec::with_capacity(instructions.len());
        for instruction in instructions {
            match self.apply(session, &instruction) {
                Ok(events) => outputs.push(Output::Events(events)),
                Err(err) => outputs.push(Output::Rejected {
                    instruction,
                    message: err.to_string(),
                }),
            }
        }
        outputs
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State> State for Layer<'a, S> {
    fn get(&self, key: &Key) -> Option<Value> {
        match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key),
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    fn delete(&mut self, key: &Key) {
        self.pending.insert(*key, Status::Delete);
    }
}
