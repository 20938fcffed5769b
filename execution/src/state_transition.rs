use crate::{EconomyError, Layer, State};
use groupclick_types::execution::{Event, Instruction, SessionId};

/// Run one instruction for `session` and write its changes to `state`.
///
/// The instruction is staged in a fresh [Layer]; only a successful
/// instruction is committed, so `state` is untouched on error.
pub fn execute_instruction<S: State>(
    state: &mut S,
    session: SessionId,
    instruction: &Instruction,
) -> Result<Vec<Event>, EconomyError> {
    let mut layer = Layer::new(state);
    let events = layer.apply(session, instruction)?;
    let changes = layer.commit();
    state.apply(changes);
    Ok(events)
}

/// Register a new session with a fresh player.
pub fn join_session<S: State>(state: &mut S, session: SessionId) -> Result<Vec<Event>, EconomyError> {
    let mut layer = Layer::new(state);
    let events = layer.join(session)?;
    let changes = layer.commit();
    state.apply(changes);
    Ok(events)
}

/// Drop the player of a session that ended.
pub fn leave_session<S: State>(
    state: &mut S,
    session: SessionId,
) -> Result<Vec<Event>, EconomyError> {
    let mut layer = Layer::new(state);
    let events = layer.leave(session)?;
    let changes = layer.commit();
    state.apply(changes);
    Ok(events)
}
