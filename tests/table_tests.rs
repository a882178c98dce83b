//! Table integration tests: games created from stored players and decks,
//! match history and statistics.

use ccg_table::cards::{CardDefinition, CardId, Deck, DeckId};
use ccg_table::core::{Action, PlayerId, PlayerProfile, SessionConfig};
use ccg_table::error::EngineError;
use ccg_table::rules::Phase;
use ccg_table::session::Table;
use ccg_table::store::{MatchStore, MemoryStore, PlayerStore};

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);
const CAROL: PlayerId = PlayerId(3);

fn table() -> Table<MemoryStore> {
    let mut store = MemoryStore::new();
    store.add_card(CardDefinition::new(CardId::new(1), "Swamp", "Basic Land - Swamp"));
    store.add_card(
        CardDefinition::new(CardId::new(2), "Drudge Skeletons", "Creature - Skeleton")
            .with_mana_cost("{1}{B}")
            .with_stats(1, 1),
    );
    for (id, name) in [(ALICE, "Alice"), (BOB, "Bob"), (CAROL, "Carol")] {
        store.add_player(PlayerProfile::new(id, name));
        store.add_deck(
            Deck::new(DeckId::new(id.raw()), id, "Mono Black", "Standard")
                .with_card(CardId::new(1), 56)
                .with_card(CardId::new(2), 4),
        );
    }
    Table::new(store, SessionConfig::new().with_seed(3))
}

#[test]
fn test_create_game_from_store() {
    let mut table = table();

    let game = table.create_game(ALICE, BOB, DeckId(1), DeckId(2)).unwrap();

    let state = table.snapshot(game).unwrap();
    assert_eq!(state.phase, Phase::Setup);
    assert_eq!(state.active_player, ALICE);
    assert_eq!(state.library_size(ALICE), 60);
    assert_eq!(state.library_size(BOB), 60);
    assert_eq!(state.player(ALICE).unwrap().name, "Alice");
    assert_eq!(state.player(BOB).unwrap().life, 20);
    assert!(state.player(BOB).unwrap().mana_pool.is_empty());
}

#[test]
fn test_deck_must_belong_to_player() {
    let mut table = table();

    let err = table
        .create_game(ALICE, BOB, DeckId(3), DeckId(2))
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::OwnershipMismatch {
            deck: DeckId(3),
            player: PlayerId(1)
        }
    ));
    assert!(table.is_empty());
}

#[test]
fn test_standard_decks_are_validated() {
    let mut table = table();
    table.store_mut().add_deck(
        Deck::new(DeckId(10), BOB, "Skeleton Army", "Standard")
            .with_card(CardId::new(1), 52)
            .with_card(CardId::new(2), 8),
    );

    let err = table
        .create_game(ALICE, BOB, DeckId(1), DeckId(10))
        .unwrap_err();

    assert!(matches!(err, EngineError::IllegalDeck { deck: DeckId(10), .. }));
    assert!(table.is_empty());
}

#[test]
fn test_stats_projected_over_history() {
    let mut table = table();

    let g1 = table.create_game(ALICE, BOB, DeckId(1), DeckId(2)).unwrap();
    table.end_game(g1, Some(ALICE)).unwrap();
    let g2 = table.create_game(BOB, ALICE, DeckId(2), DeckId(1)).unwrap();
    table.end_game(g2, None).unwrap();
    let g3 = table.create_game(ALICE, CAROL, DeckId(1), DeckId(3)).unwrap();
    table.end_game(g3, Some(CAROL)).unwrap();
    let running = table.create_game(BOB, CAROL, DeckId(2), DeckId(3)).unwrap();

    let alice = table.store().get_stats(ALICE).unwrap();
    assert_eq!(
        (alice.games_played, alice.games_won, alice.games_lost, alice.games_drawn),
        (3, 1, 1, 1)
    );
    let bob = table.stats(BOB);
    assert_eq!((bob.games_played, bob.games_lost, bob.games_drawn), (2, 1, 1));
    assert_eq!(table.stats(CAROL).games_won, 1);
    assert!(!table.session(running).unwrap().is_over());
    assert_eq!(table.store().matches_for(BOB).len(), 2);
}

#[test]
fn test_end_game_twice_is_rejected() {
    let mut table = table();
    let game = table.create_game(ALICE, BOB, DeckId(1), DeckId(2)).unwrap();
    table.end_game(game, Some(BOB)).unwrap();

    assert!(matches!(
        table.end_game(game, Some(ALICE)),
        Err(EngineError::GameOver)
    ));
    assert_eq!(table.stats(BOB).games_won, 1);
    assert_eq!(table.stats(ALICE).games_won, 0);
}

#[test]
fn test_actions_through_table() {
    let mut table = table();
    let game = table.create_game(ALICE, BOB, DeckId(1), DeckId(2)).unwrap();

    let actions = [
        Action::StartTurn { player: ALICE },
        Action::ChangePhase { phase: Phase::Untap },
        Action::ChangePhase { phase: Phase::Draw },
    ];
    for action in actions {
        assert!(table.apply(game, action).unwrap().is_ok());
    }

    let state = table.snapshot(game).unwrap();
    assert_eq!(state.hand_size(ALICE), 1);
    assert_eq!(state.history.len(), 3);
}

#[test]
fn test_action_from_ui_json() {
    let mut table = table();
    let game = table.create_game(ALICE, BOB, DeckId(1), DeckId(2)).unwrap();

    let action: Action =
        serde_json::from_str(r#"{"draw_cards": {"player": 2, "count": 2}}"#).unwrap();
    let response = table.apply(game, action).unwrap();

    assert!(response.is_ok());
    assert_eq!(response.state.hand_size(BOB), 2);
}
