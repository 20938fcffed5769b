use super::super::*;
use crate::economy;
use groupclick_types::economy::GroupId;

impl<'a, S: State> Layer<'a, S> {
    pub(in crate::layer) fn handle_select_group(
        &mut self,
        session: SessionId,
        group: GroupId,
    ) -> Result<Vec<Event>, EconomyError> {
        let mut player = self.load_player(&session)?;
        economy::select_group(&mut player, group)?;
        self.insert(Key::Player(session), Value::Player(player));

        Ok(vec![Event::GroupSelected { session, group }])
    }
}
