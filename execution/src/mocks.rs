use crate::{state_transition, Memory};
use groupclick_types::{
    economy::GroupId,
    execution::{Instruction, SessionId},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Deterministic session id for tests.
pub fn create_session(seed: u64) -> SessionId {
    let mut rng = StdRng::seed_from_u64(seed);
    SessionId::from(rng.gen::<u128>())
}

/// Join `session` to `state`, pick `group` and click `clicks` times.
pub fn create_player(state: &mut Memory, session: SessionId, group: GroupId, clicks: u64) {
    state_transition::join_session(state, session).expect("session should be new");
    state_transition::execute_instruction(state, session, &Instruction::SelectGroup { group })
        .expect("fresh player can select a group");
    for _ in 0..clicks {
        state_transition::execute_instruction(state, session, &Instruction::Click)
            .expect("player with a group can click");
    }
}

/// Economy with one player per group, each having clicked `clicks` times.
pub fn create_economy(clicks: u64) -> (Memory, Vec<SessionId>) {
    let mut state = Memory::default();
    let mut sessions = Vec::new();
    for (i, group) in GroupId::ALL.into_iter().enumerate() {
        let session = create_session(i as u64);
        create_player(&mut state, session, group, clicks);
        sessions.push(session);
    }
    (state, sessions)
}
