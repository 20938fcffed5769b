use super::super::*;
use crate::{economy, state::load_groups};

impl<'a, S: State> Layer<'a, S> {
    pub(in crate::layer) fn handle_click(
        &mut self,
        session: SessionId,
    ) -> Result<Vec<Event>, EconomyError> {
        let mut player = self.load_player(&session)?;
        let mut groups = load_groups(self);
        let group = economy::apply_click(&mut player, &mut groups)?;

        let total_wealth = groups[group].total_wealth;
        self.insert(Key::Player(session), Value::Player(player));
        self.insert(Key::Group(group), Value::Group(groups[group]));

        Ok(vec![Event::Clicked {
            session,
            group,
            total_wealth,
        }])
    }
}
