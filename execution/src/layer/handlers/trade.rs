use super::super::*;
use crate::{economy, state::load_rates};
use groupclick_types::economy::Currency;

impl<'a, S: State> Layer<'a, S> {
    pub(in crate::layer) fn handle_trade(
        &mut self,
        session: SessionId,
        from: Currency,
        to: Currency,
        amount: i64,
    ) -> Result<Vec<Event>, EconomyError> {
        let mut player = self.load_player(&session)?;
        let mut rates = load_rates(self);
        let settlement = economy::trade(&mut player, from, to, amount, &mut rates)?;

        self.insert(Key::Player(session), Value::Player(player));
        if settlement.rate_after.is_some() {
            self.insert(Key::Rates, Value::Rates(rates));
        }

        Ok(vec![Event::Traded {
            session,
            from,
            to,
            amount: settlement.amount,
            received: settlement.received,
            rate_after: settlement.rate_after,
        }])
    }
}
