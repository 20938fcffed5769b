use super::super::*;

impl<'a, S: State> Layer<'a, S> {
    pub(in crate::layer) fn handle_join(
        &mut self,
        session: SessionId,
    ) -> Result<Vec<Event>, EconomyError> {
        if load_player(self, &session).is_some() {
            return Err(EconomyError::SessionExists(session));
        }
        self.insert(Key::Player(session), Value::Player(Player::new()));

        Ok(vec![Event::PlayerJoined { session }])
    }

    pub(in crate::layer) fn handle_leave(
        &mut self,
        session: SessionId,
    ) -> Result<Vec<Event>, EconomyError> {
        self.load_player(&session)?;
        self.delete(&Key::Player(session));

        Ok(vec![Event::PlayerLeft { session }])
    }
}
