use super::*;
use groupclick_execution::{mocks::create_economy, FileStore};
use groupclick_types::economy::{
    Currency, GroupId, Rate, ERROR_GROUP_ALREADY_SELECTED, ERROR_NO_GROUP, MAX_SNAPSHOT_PLAYERS,
};
use std::collections::HashMap;
use tempfile::TempDir;

fn hub() -> Hub {
    Hub::new(Settings::default(), None)
}

fn player_of(message: &ServerMessage) -> &groupclick_types::economy::Player {
    match message {
        ServerMessage::InitialState { player, .. } | ServerMessage::Result { player, .. } => player,
        other => panic!("expected a player in {other:?}"),
    }
}

#[test]
fn test_join_sends_initial_state() {
    let hub = hub();
    let (_, initial) = hub.join().unwrap();
    let ServerMessage::InitialState {
        groups,
        rates,
        player,
    } = initial
    else {
        panic!("expected initial state");
    };
    assert_eq!(player.group, None);
    assert_eq!(player.common_currency, 0);
    for group in GroupId::ALL {
        assert_eq!(groups[group].total_wealth, 0);
        assert_eq!(rates[group], Rate::MIN);
    }
    assert_eq!(hub.summary().players, 1);
}

#[test]
fn test_click_needs_group() {
    let hub = hub();
    let mut updates = hub.update_subscriber();
    let (session, _) = hub.join().unwrap();

    assert_eq!(
        hub.submit(session, &Instruction::Click),
        ServerMessage::error(ERROR_NO_GROUP)
    );
    // Rejections are never broadcast
    assert!(updates.try_recv().is_err());
}

#[test]
fn test_click_replies_and_broadcasts() {
    let hub = hub();
    let mut updates = hub.update_subscriber();
    let (session, _) = hub.join().unwrap();

    let reply = hub.submit(session, &Instruction::SelectGroup { group: GroupId::A });
    assert_eq!(player_of(&reply).group, Some(GroupId::A));
    // Selecting a group is private to the session
    assert!(updates.try_recv().is_err());

    let reply = hub.submit(session, &Instruction::Click);
    let player = player_of(&reply);
    assert_eq!(player.common_currency, 1);
    assert_eq!(player.group_currencies[GroupId::A], 1);

    match updates.try_recv().unwrap() {
        ServerMessage::StateUpdate {
            groups,
            player_id,
            player,
            ..
        } => {
            assert_eq!(player_id, session);
            assert_eq!(groups[GroupId::A].total_wealth, 1);
            assert_eq!(player.common_currency, 1);
        }
        other => panic!("expected state update, got {other:?}"),
    }
}

#[test]
fn test_trade_moves_shared_rates() {
    let hub = hub();
    let (alice, _) = hub.join().unwrap();
    let (bob, _) = hub.join().unwrap();
    hub.submit(alice, &Instruction::SelectGroup { group: GroupId::B });
    hub.submit(alice, &Instruction::Click);

    let reply = hub.submit(
        alice,
        &Instruction::Trade {
            from: GroupId::B.into(),
            to: Currency::Common,
            amount: 1,
        },
    );
    let ServerMessage::Result { rates, player, .. } = reply else {
        panic!("expected result");
    };
    assert_eq!(rates[GroupId::B], Rate::new(2));
    assert_eq!(player.common_currency, 2);
    assert_eq!(player.group_currencies[GroupId::B], 0);

    // Bob sees the same rate
    let reply = hub.submit(bob, &Instruction::SelectGroup { group: GroupId::C });
    let ServerMessage::Result { rates, .. } = reply else {
        panic!("expected result");
    };
    assert_eq!(rates[GroupId::B], Rate::new(2));

    // And switching groups is refused
    assert_eq!(
        hub.submit(bob, &Instruction::SelectGroup { group: GroupId::A }),
        ServerMessage::error(ERROR_GROUP_ALREADY_SELECTED)
    );
}

#[test]
fn test_leave_removes_player_keeps_wealth() {
    let hub = hub();
    let (session, _) = hub.join().unwrap();
    hub.submit(session, &Instruction::SelectGroup { group: GroupId::D });
    hub.submit(session, &Instruction::Click);

    hub.leave(session);
    let summary = hub.summary();
    assert_eq!(summary.players, 0);
    assert_eq!(summary.groups[GroupId::D].total_wealth, 1);

    // Commands from a departed session fail
    assert!(matches!(
        hub.submit(session, &Instruction::Click),
        ServerMessage::Error { .. }
    ));
}

#[test]
fn test_click_limiter() {
    let hub = hub();
    let limiter = hub.click_limiter().unwrap();
    assert!(limiter.check().is_ok());
    assert!(limiter.check().is_err());

    let unlimited = Hub::new(
        Settings {
            click_interval: None,
            ..Settings::default()
        },
        None,
    );
    assert!(unlimited.click_limiter().is_none());
}

#[test]
fn test_restore_drops_players() {
    let (state, _) = create_economy(3);
    let mut snapshot = state.snapshot();
    snapshot.rates[GroupId::C] = Rate::new(4);
    assert_eq!(snapshot.players.len(), 4);

    let hub = Hub::new(Settings::default(), Some(snapshot));
    let summary = hub.summary();
    assert_eq!(summary.players, 0);
    assert_eq!(summary.rates[GroupId::C], Rate::MAX);
    for group in GroupId::ALL {
        assert_eq!(summary.groups[group].total_wealth, 3);
    }
}

#[test]
fn test_save_and_restore() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("economy.snapshot"));

    let hub = hub();
    let (session, _) = hub.join().unwrap();
    hub.submit(session, &Instruction::SelectGroup { group: GroupId::A });
    hub.submit(session, &Instruction::Click);
    hub.save(&store).unwrap();

    let restored = Hub::new(Settings::default(), store.load().unwrap());
    let summary = restored.summary();
    assert_eq!(summary.groups[GroupId::A].total_wealth, 1);
    assert_eq!(summary.players, 0);
}

#[test]
fn test_save_with_more_players_than_snapshot_cap() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("economy.snapshot"));

    let hub = hub();
    {
        let mut state = hub.state();
        for i in 0..=MAX_SNAPSHOT_PLAYERS {
            join_session(&mut *state, SessionId::from(i as u128)).unwrap();
        }
    }
    let (session, _) = hub.join().unwrap();
    hub.submit(session, &Instruction::SelectGroup { group: GroupId::D });
    hub.submit(session, &Instruction::Click);
    assert_eq!(hub.summary().players, MAX_SNAPSHOT_PLAYERS + 2);

    hub.save(&store).unwrap();
    let saved = store.load().unwrap().expect("snapshot should exist");
    assert!(saved.players.is_empty());
    assert_eq!(saved.groups[GroupId::D].total_wealth, 1);

    let restored = Hub::new(Settings::default(), Some(saved));
    assert_eq!(restored.summary().groups[GroupId::D].total_wealth, 1);
}

#[tokio::test]
async fn test_periodic_snapshots() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(dir.path().join("economy.snapshot")));
    let hub = Arc::new(hub());
    let (session, _) = hub.join().unwrap();
    hub.submit(session, &Instruction::SelectGroup { group: GroupId::B });
    hub.submit(session, &Instruction::Click);

    let handle = spawn_snapshots(hub.clone(), store.clone(), Duration::from_millis(20));
    let mut saved = None;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        saved = store.load().unwrap();
        if saved.is_some() {
            break;
        }
    }
    handle.abort();

    let saved = saved.expect("snapshot should have been written");
    assert_eq!(saved.groups[GroupId::B].total_wealth, 1);
}

#[test]
fn test_encode_failure_is_an_error() {
    let reply = encode_message(&ServerMessage::error(ERROR_NO_GROUP)).unwrap();
    assert!(matches!(reply, Message::Text(text) if text.contains(ERROR_NO_GROUP)));

    // JSON object keys must be strings
    let unencodable: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
    assert!(encode_message(&unencodable).is_err());
}
