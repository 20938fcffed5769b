use super::*;
use crate::{api::ServerMessage, Instruction, SessionId, Snapshot};
use commonware_codec::{DecodeExt, Encode, ReadExt};

#[test]
fn test_rate_is_clamped() {
    assert_eq!(Rate::new(0).get(), MIN_RATE);
    assert_eq!(Rate::new(9).get(), MAX_RATE);
    assert_eq!(Rate::new(3).get(), 3);
    assert_eq!(Rate::MAX.raise(), Rate::MAX);
    assert_eq!(Rate::MIN.lower(), Rate::MIN);
    assert_eq!(Rate::new(2).raise().get(), 3);
    assert_eq!(Rate::new(2).lower().get(), 1);
    assert_eq!(Rate::default().get(), INITIAL_RATE);
}

#[test]
fn test_rate_decode_rejects_out_of_range() {
    let encoded = 0u8.encode();
    assert!(Rate::read(&mut &encoded[..]).is_err());
    let encoded = 5u8.encode();
    assert!(Rate::read(&mut &encoded[..]).is_err());
    let encoded = 4u8.encode();
    assert_eq!(Rate::read(&mut &encoded[..]).unwrap(), Rate::MAX);
}

#[test]
fn test_currency_parse() {
    assert_eq!("Common".parse::<Currency>().unwrap(), Currency::Common);
    assert_eq!(
        "C".parse::<Currency>().unwrap(),
        Currency::Group(GroupId::C)
    );
    assert!("E".parse::<Currency>().is_err());
    assert!("common".parse::<Currency>().is_err());
    assert_eq!(Currency::Group(GroupId::D).to_string(), "D");
}

#[test]
fn test_player_balance_accessors() {
    let mut player = Player::new();
    *player.balance_mut(Currency::Common) += 7;
    *player.balance_mut(Currency::Group(GroupId::B)) += 3;
    assert_eq!(player.balance(Currency::Common), 7);
    assert_eq!(player.balance(Currency::Group(GroupId::B)), 3);
    assert_eq!(player.balance(Currency::Group(GroupId::A)), 0);
    assert_eq!(player.group_currencies.iter().map(|(_, v)| *v).sum::<u64>(), 3);
}

#[test]
fn test_snapshot_roundtrip() {
    let mut snapshot = Snapshot::default();
    snapshot.groups[GroupId::B].total_wealth = 42;
    snapshot.rates[GroupId::C] = Rate::new(3);
    let mut player = Player::new();
    player.group = Some(GroupId::B);
    player.common_currency = 10;
    player.group_currencies[GroupId::B] = 4;
    snapshot.players.insert(SessionId::from(7), player);
    snapshot.players.insert(SessionId::from(9), Player::new());

    let encoded = snapshot.encode();
    let decoded = Snapshot::decode(encoded.as_ref()).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn test_snapshot_decode_rejects_truncated_and_bad_version() {
    let encoded = Snapshot::default().encode();
    assert!(Snapshot::decode(&encoded[..encoded.len() - 1]).is_err());

    let mut bad = encoded.to_vec();
    bad[0] = SNAPSHOT_VERSION + 1;
    assert!(Snapshot::decode(bad.as_slice()).is_err());
}

#[test]
fn test_shared_only_drops_players() {
    let mut snapshot = Snapshot::default();
    snapshot.groups[GroupId::A].total_wealth = 5;
    snapshot.players.insert(SessionId::from(1), Player::new());
    let shared = snapshot.shared_only();
    assert!(shared.players.is_empty());
    assert_eq!(shared.groups[GroupId::A].total_wealth, 5);
}

#[test]
fn test_instruction_json_shape() {
    let trade: Instruction =
        serde_json::from_str(r#"{"type":"trade","from":"Common","to":"A","amount":5}"#).unwrap();
    assert_eq!(
        trade,
        Instruction::Trade {
            from: Currency::Common,
            to: Currency::Group(GroupId::A),
            amount: 5,
        }
    );
    let select: Instruction =
        serde_json::from_str(r#"{"type":"selectGroup","group":"D"}"#).unwrap();
    assert_eq!(select, Instruction::SelectGroup { group: GroupId::D });
    let click: Instruction = serde_json::from_str(r#"{"type":"click"}"#).unwrap();
    assert_eq!(click, Instruction::Click);

    assert!(serde_json::from_str::<Instruction>(r#"{"type":"selectGroup","group":"Z"}"#).is_err());
    assert!(serde_json::from_str::<Instruction>(r#"{"type":"jump"}"#).is_err());
}

fn message_player(message: &ServerMessage) -> &Player {
    match message {
        ServerMessage::Result { player, .. } => player,
        other => panic!("expected a result, got {other:?}"),
    }
}

#[test]
fn test_server_message_json_shape() {
    let mut player = Player::new();
    player.group = Some(GroupId::A);
    player.common_currency = 1;
    let message = ServerMessage::Result {
        groups: Groups::default(),
        rates: RateTable::default(),
        player,
    };
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["type"], "result");
    assert_eq!(value["player"]["group"], "A");
    assert_eq!(value["player"]["commonCurrency"], 1);
    assert_eq!(value["player"]["groupCurrencies"]["D"], 0);
    assert_eq!(value["groups"]["B"]["totalWealth"], 0);
    assert_eq!(value["rates"]["C"], 1);

    let error = serde_json::to_value(ServerMessage::error(ERROR_NO_GROUP)).unwrap();
    assert_eq!(error["type"], "error");
    assert_eq!(error["error"], ERROR_NO_GROUP);

    let update = serde_json::to_value(ServerMessage::StateUpdate {
        groups: Groups::default(),
        rates: RateTable::default(),
        player_id: SessionId::from(1),
        player: message_player(&message).clone(),
    })
    .unwrap();
    assert_eq!(update["type"], "stateUpdate");
    assert!(update["playerId"].is_string());
    assert_eq!(update["player"]["commonCurrency"], 1);
}

#[test]
fn test_rate_json_is_clamped() {
    let rates: RateTable = serde_json::from_str(r#"{"A":0,"B":2,"C":4,"D":7}"#).unwrap();
    assert_eq!(rates[GroupId::A], Rate::MIN);
    assert_eq!(rates[GroupId::B].get(), 2);
    assert_eq!(rates[GroupId::D], Rate::MAX);
}
