//! Worldtest: end-to-end park sessions
//!
//! Validates:
//! - Gathering the default collectibles and crafting a salad
//! - Each collectible is credited exactly once
//! - Axe gating, chopping, wood scatter and pickup
//! - Shelter building at the bench and climbing a lookout
//! - Fishing resolution, lure gating and cancellation
//! - Storage deposit / withdraw through the chest

use glam::Vec3;
use lettuce_park_core::{ItemKind, SimTick};
use lettuce_park_testkit::{EventRecord, JsonlSink, ScriptedRandom};
use lettuce_park_world::{
    ActionError, Capability, Interactable, MovementIntent, Session, SessionConfig, SessionEvent,
    ShelterVariant, SpawnKind, Tag,
};

const DT: f32 = 1.0 / 60.0;

fn session_at_origin(config: SessionConfig) -> Session {
    let config = SessionConfig {
        spawn_position: Vec3::ZERO,
        ..config
    };
    Session::new(config, ScriptedRandom::constant(0.0))
}

fn latest_log(session: &Session) -> String {
    session
        .log()
        .latest()
        .map(|line| line.message.clone())
        .unwrap_or_default()
}

#[test]
fn salad_from_default_park_worldtest() {
    let log_path = std::env::temp_dir().join("lettuce_park_salad_worldtest.jsonl");
    let mut event_log = JsonlSink::create(&log_path).expect("create event log");

    let mut session = Session::new(SessionConfig::default(), ScriptedRandom::constant(0.0));
    let park = session.populate_default();
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), None, "spawn point should be clear");

    // The first three spawn points hold one lettuce, stick and stone.
    for id in park.collectibles.iter().take(3) {
        let position = session.registry().get(*id).unwrap().position;
        session.teleport(position + Vec3::new(0.0, 1.4, 0.0));
        session.tick(DT, MovementIntent::NONE);
        assert_eq!(session.focused(), Some(*id));
        session.activate().expect("collect");
    }
    assert_eq!(session.inventory().count(ItemKind::Lettuce), 1);
    assert_eq!(session.inventory().count(ItemKind::Stick), 1);
    assert_eq!(session.inventory().count(ItemKind::Stone), 1);

    session.craft("salad").expect("craft salad");
    assert_eq!(session.inventory().count(ItemKind::Salad), 1);
    assert_eq!(session.inventory().count(ItemKind::Lettuce), 0);
    assert_eq!(session.inventory().count(ItemKind::Stick), 0);
    assert_eq!(session.inventory().count(ItemKind::Stone), 0);
    assert_eq!(latest_log(&session), "Crafted a 🥗 SaaSquatch Salad!");

    // A second salad fails and leaves everything in place.
    let before = session.inventory().clone();
    let err = session.craft("salad").unwrap_err();
    assert!(matches!(err, ActionError::MissingIngredients { .. }));
    assert_eq!(session.inventory(), &before);
    assert_eq!(latest_log(&session), err.to_string());

    let tick = session.tick_count();
    for event in session.drain_events() {
        event_log
            .write(&EventRecord {
                tick,
                kind: event.kind(),
                payload: &event,
            })
            .expect("write event");
    }
    event_log.flush().expect("flush");
    assert!(event_log.written() > 0);
}

#[test]
fn collectible_is_credited_exactly_once() {
    let mut session = session_at_origin(SessionConfig::default());
    let id = session.register(Interactable::new(
        "Wild Lettuce",
        Vec3::new(1.0, 0.0, 0.0),
        Capability::Collect(ItemKind::Lettuce),
    ));

    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(id));
    session.activate().unwrap();
    // Same signal again before the next tick: focus was cleared.
    assert_eq!(session.activate(), Err(ActionError::NothingFocused));

    for _ in 0..5 {
        session.tick(DT, MovementIntent::NONE);
        assert_eq!(session.focused(), None);
        assert_eq!(session.activate(), Err(ActionError::NothingFocused));
    }
    assert_eq!(session.inventory().count(ItemKind::Lettuce), 1);
    assert!(!session.registry().get(id).unwrap().enabled);
}

#[test]
fn walking_brings_items_into_focus() {
    let mut session = session_at_origin(SessionConfig::default());
    let id = session.register(Interactable::new(
        "River Stone",
        Vec3::new(0.0, 0.0, -6.0),
        Capability::Collect(ItemKind::Stone),
    ));
    let forward = MovementIntent {
        forward: true,
        ..MovementIntent::NONE
    };

    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), None);
    // 6 units/s for half a second covers 3 units: 3 away, inside 3.5.
    for _ in 0..30 {
        session.tick(DT, forward);
    }
    assert_eq!(session.focused(), Some(id));
    assert_eq!(session.prompt(), "Press E to gather 🪨 River Stone");
}

#[test]
fn chop_and_build_lookout_worldtest() {
    let mut session = session_at_origin(SessionConfig::default());
    let axe = session.register(Interactable::new(
        "Trusty Axe",
        Vec3::new(0.0, 0.0, 1.0),
        Capability::ToolPickup(ItemKind::Axe),
    ));
    let tree_position = Vec3::new(2.0, 0.0, 0.0);
    let tree = session.register(Interactable::new(
        "Old Oak",
        tree_position,
        Capability::Chop {
            yields: (2, 4),
            chopped: false,
        },
    ));
    session.register(
        Interactable::new(
            "Crafting Bench",
            Vec3::new(10.0, 0.0, 3.0),
            Capability::CraftingBenchToggle,
        )
        .with_tag(Tag::Crafting),
    );

    // No axe yet.
    session.teleport(Vec3::new(3.5, 0.0, 0.0));
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(tree));
    assert_eq!(session.prompt(), "You need an 🪓 Trusty Axe to chop the Old Oak");
    assert_eq!(
        session.activate(),
        Err(ActionError::MissingTool { tool: ItemKind::Axe })
    );
    assert_eq!(latest_log(&session), "You need a Trusty Axe to do that.");
    assert!(session.registry().get(tree).unwrap().enabled);

    session.teleport(Vec3::ZERO);
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(axe));
    session.activate().unwrap();
    assert_eq!(session.inventory().count(ItemKind::Axe), 1);

    // Four drops: count draw, then (angle, distance) per drop.
    session.set_random_source(ScriptedRandom::new(vec![
        0.99, 0.0, 0.0, 0.25, 0.5, 0.5, 1.0, 0.75, 0.9,
    ]));
    session.teleport(Vec3::new(3.5, 0.0, 0.0));
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.prompt(), "Press E to chop the Old Oak");
    session.drain_events();
    session.activate().unwrap();

    let tree_entry = session.registry().get(tree).unwrap();
    assert!(!tree_entry.enabled);
    assert_eq!(
        tree_entry.capability,
        Capability::Chop {
            yields: (2, 4),
            chopped: true
        }
    );

    let drops: Vec<_> = session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            SessionEvent::Spawned {
                kind: SpawnKind::Item(ItemKind::Wood),
                position,
                interactable: Some(id),
            } => Some((id, position)),
            _ => None,
        })
        .collect();
    assert_eq!(drops.len(), 4);
    for (_, position) in &drops {
        let offset = *position - tree_position;
        assert!(offset.y.abs() < 1e-5);
        let reach = offset.length();
        assert!((0.4 - 1e-4..=1.2 + 1e-4).contains(&reach), "drop at {reach}");
    }

    for (id, position) in &drops {
        session.teleport(*position);
        session.tick(DT, MovementIntent::NONE);
        assert_eq!(session.focused(), Some(*id));
        session.activate().unwrap();
    }
    assert_eq!(session.inventory().count(ItemKind::Wood), 4);

    // Shelter needs the bench.
    session.give(ItemKind::Stone, 2).unwrap();
    session.teleport(Vec3::new(10.0, 0.0, 20.0));
    assert_eq!(
        session.craft("shelter"),
        Err(ActionError::NotNearStation { tag: Tag::Crafting })
    );
    assert_eq!(session.inventory().count(ItemKind::Wood), 4);

    session.set_random_source(ScriptedRandom::constant(0.9));
    session.teleport(Vec3::new(10.0, 0.0, 4.0));
    session.drain_events();
    session.craft("shelter").unwrap();
    assert_eq!(session.inventory().count(ItemKind::Wood), 0);
    assert_eq!(session.inventory().count(ItemKind::Stone), 0);
    assert_eq!(latest_log(&session), "Built a Lookout Tower!");

    let base = Vec3::new(10.0, 0.0, 2.0);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::Spawned {
        kind: SpawnKind::Shelter(ShelterVariant::Lookout),
        position: base,
        interactable: None,
    }));
    let ladder = events
        .iter()
        .find_map(|event| match event {
            SessionEvent::Spawned {
                kind: SpawnKind::Ladder,
                interactable,
                ..
            } => *interactable,
            _ => None,
        })
        .expect("lookout ladder");

    session.teleport(Vec3::new(10.0, 0.0, 1.5));
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(ladder));
    session.activate().unwrap();
    assert_eq!(session.player().position, base + Vec3::new(0.0, 4.5, 0.0));
}

#[test]
fn fishing_resolves_on_schedule_worldtest() {
    let config = SessionConfig {
        fishing_duration: (3.0, 3.0),
        ..SessionConfig::default()
    };
    let mut session = session_at_origin(config);
    let spot = session.register(
        Interactable::new(
            "Pond Shallows",
            Vec3::new(1.0, 0.0, 0.0),
            Capability::Fish {
                difficulty: 0.3,
                requires_lure: false,
            },
        )
        .with_tag(Tag::Water),
    );

    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(spot));
    session.activate().unwrap();
    assert!(session.fishing().is_waiting());
    assert_eq!(session.fishing_status(), "Waiting for a bite... 0%");

    session.tick(1.0, MovementIntent::NONE);
    assert_eq!(session.prompt(), "Fishing... (press Q to reel in)");
    assert_eq!(session.fishing_status(), "Waiting for a bite... 33%");
    assert_eq!(session.activate(), Err(ActionError::AlreadyFishing));

    session.tick(1.0, MovementIntent::NONE);
    assert_eq!(session.inventory().count(ItemKind::Fish), 0);
    session.tick(1.0, MovementIntent::NONE);
    assert_eq!(session.inventory().count(ItemKind::Fish), 1);
    assert!(!session.fishing().is_waiting());
    assert_eq!(session.fishing_status(), "");
    assert_eq!(latest_log(&session), "You caught a 🐟 Lake Fish!");

    // Nothing more is credited later.
    for _ in 0..10 {
        session.tick(1.0, MovementIntent::NONE);
    }
    assert_eq!(session.inventory().count(ItemKind::Fish), 1);
}

#[test]
fn fishing_prompt_returns_after_catch_and_reel_in() {
    let config = SessionConfig {
        fishing_duration: (1.0, 1.0),
        ..SessionConfig::default()
    };
    let mut session = session_at_origin(config);
    let spot = session.register(Interactable::new(
        "Pond Shallows",
        Vec3::new(1.0, 0.0, 0.0),
        Capability::Fish {
            difficulty: 0.3,
            requires_lure: false,
        },
    ));

    session.tick(DT, MovementIntent::NONE);
    session.activate().unwrap();
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.prompt(), "Fishing... (press Q to reel in)");

    session.tick(2.0, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(spot));
    assert!(!session.fishing().is_waiting());
    assert_eq!(session.inventory().count(ItemKind::Fish), 1);
    assert_eq!(session.prompt(), "Press E to fish at the Pond Shallows");

    session.activate().unwrap();
    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.prompt(), "Fishing... (press Q to reel in)");
    session.drain_events();
    session.cancel_fishing().unwrap();
    assert_eq!(session.prompt(), "Press E to fish at the Pond Shallows");
    assert!(session.drain_events().contains(&SessionEvent::PromptChanged {
        text: String::from("Press E to fish at the Pond Shallows"),
    }));
}

#[test]
fn unlucky_cast_escapes() {
    let config = SessionConfig {
        fishing_duration: (1.0, 1.0),
        ..SessionConfig::default()
    };
    let mut session = session_at_origin(config);
    session.register(Interactable::new(
        "Pond Shallows",
        Vec3::new(1.0, 0.0, 0.0),
        Capability::Fish {
            difficulty: 0.3,
            requires_lure: false,
        },
    ));
    session.set_random_source(ScriptedRandom::constant(0.99));
    session.tick(DT, MovementIntent::NONE);
    session.activate().unwrap();
    session.tick(2.0, MovementIntent::NONE);
    assert!(!session.fishing().is_waiting());
    assert_eq!(session.inventory().count(ItemKind::Fish), 0);
    assert_eq!(latest_log(&session), "The fish got away...");
}

#[test]
fn lure_spot_consumes_lure_and_cancel_forfeits() {
    let mut session = session_at_origin(SessionConfig::default());
    session.register(Interactable::new(
        "Deep Water",
        Vec3::new(1.0, 0.0, 0.0),
        Capability::Fish {
            difficulty: 0.7,
            requires_lure: true,
        },
    ));

    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.prompt(), "You need a 🪝 Shiny Lure to fish at the Deep Water");
    assert_eq!(session.activate(), Err(ActionError::MissingLure));
    assert!(!session.fishing().is_waiting());

    session.give(ItemKind::Lure, 1).unwrap();
    session.tick(DT, MovementIntent::NONE);
    session.activate().unwrap();
    assert_eq!(session.inventory().count(ItemKind::Lure), 0);
    assert!(session.fishing().is_waiting());

    session.cancel_fishing().unwrap();
    assert!(!session.fishing().is_waiting());
    assert_eq!(session.fishing_status(), "");
    assert_eq!(session.cancel_fishing(), Err(ActionError::NotFishing));
    for _ in 0..10 {
        session.tick(1.0, MovementIntent::NONE);
    }
    assert_eq!(session.inventory().count(ItemKind::Fish), 0);
}

#[test]
fn chest_deposits_then_withdraws_worldtest() {
    let mut session = session_at_origin(SessionConfig::default());
    let chest = session.register(
        Interactable::new(
            "Storage Chest",
            Vec3::new(1.0, 0.0, 0.0),
            Capability::StorageManage,
        )
        .with_tag(Tag::Storage),
    );
    session.give(ItemKind::Lettuce, 2).unwrap();
    session.give(ItemKind::Stone, 1).unwrap();
    session.give(ItemKind::Axe, 1).unwrap();

    session.tick(DT, MovementIntent::NONE);
    assert_eq!(session.focused(), Some(chest));
    session.activate().unwrap();
    assert_eq!(latest_log(&session), "Stored 3 items in storage.");
    assert_eq!(session.inventory().count(ItemKind::Axe), 1);
    assert_eq!(session.inventory().count(ItemKind::Lettuce), 0);
    assert_eq!(
        session.storage().rows(),
        vec![(ItemKind::Lettuce, 2), (ItemKind::Stone, 1)]
    );

    session.tick(DT, MovementIntent::NONE);
    session.activate().unwrap();
    assert_eq!(
        latest_log(&session),
        "Took 1 🥬 Lettuce Leaves from the Storage Chest."
    );
    assert_eq!(session.inventory().count(ItemKind::Lettuce), 1);
    assert_eq!(session.storage().count(ItemKind::Lettuce), 1);

    assert_eq!(
        session.withdraw(ItemKind::Stone, 5),
        Err(ActionError::StorageShort {
            kind: ItemKind::Stone,
            available: 1
        })
    );
    session.withdraw(ItemKind::Stone, 1).unwrap();
    assert_eq!(session.inventory().count(ItemKind::Stone), 1);
    assert_eq!(session.tick_count(), SimTick(2));
}
