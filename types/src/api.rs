use serde::{Deserialize, Serialize};

use crate::{
    economy::{Groups, Player, RateTable},
    execution::SessionId,
};

/// Message pushed from the server to a connected session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once right after the socket opens.
    InitialState {
        groups: Groups,
        rates: RateTable,
        player: Player,
    },

    /// Reply to a command that was applied.
    Result {
        groups: Groups,
        rates: RateTable,
        player: Player,
    },

    /// Reply to a command that was rejected. State is unchanged.
    Error { error: String },

    /// Broadcast to every session after a click or trade by anyone.
    /// `player` is the acting player's state after the command.
    #[serde(rename_all = "camelCase")]
    StateUpdate {
        groups: Groups,
        rates: RateTable,
        player_id: SessionId,
        player: Player,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Whether this message answers a command (as opposed to a broadcast).
    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Result { .. } | Self::Error { .. })
    }
}

/// Public view of the shared economy returned by `GET /state`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub groups: Groups,
    pub rates: RateTable,
    /// Number of connected players.
    pub players: usize,
}
