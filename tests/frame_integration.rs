//=========================================================================
// Frame Integration Tests
//=========================================================================
//
// Drives whole frames through `Engine::step` and checks what listeners
// observe: delivery latency per queue, collision pairing rules and
// teardown.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use relay_engine::prelude::*;

//=== Test Helpers ========================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type Hits = Rc<RefCell<Vec<(EventTypeId, Option<GameObjectId>)>>>;

/// Engine with an active "level" scene and an inactive "lobby".
fn engine() -> Engine {
    init_logging();
    EngineBuilder::new().build().init(|ctx| {
        ctx.world.register_scene("level");
        ctx.world.register_scene("lobby");
        ctx.world.set_active_scene("level").unwrap();
    })
}

fn spawn(engine: &mut Engine, scene: &str, x: i32, y: i32) -> GameObjectId {
    let ctx = engine.context_mut();
    let id = ctx.world.spawn(scene, "obj").unwrap();
    ctx.world.transform_mut(id).unwrap().move_by((x, y), true);
    id
}

fn collider(engine: &mut Engine, owner: GameObjectId, layer: &str, physics: bool) {
    let collider = Collider::new(owner, Rect::new(0, 0, 16, 16), [layer], physics).unwrap();
    engine.context_mut().spawn_collider(collider).unwrap();
}

fn record(engine: &mut Engine, owner: GameObjectId, kind: EventTypeId) -> Hits {
    let hits: Hits = Rc::default();
    let sink = Rc::clone(&hits);
    engine
        .context_mut()
        .events
        .register_event_hook(kind, &owner, "record", move |event: &Event, _: &mut EventContext<'_>| {
            sink.borrow_mut().push((event.kind(), event.collides()))
        });
    hits
}

//=== Collision Scenarios =================================================

#[test]
fn solid_pair_reaches_both_owners_in_detecting_frame() {
    let mut engine = engine();
    let player = spawn(&mut engine, "level", 0, 0);
    let enemy = spawn(&mut engine, "level", 8, 8);
    collider(&mut engine, player, "player", true);
    collider(&mut engine, enemy, "enemy", true);
    engine.context_mut().collisions.enable_collision("player", "enemy");
    let player_hits = record(&mut engine, player, EventTypeId::COLLISION);
    let enemy_hits = record(&mut engine, enemy, EventTypeId::COLLISION);

    assert_eq!(engine.step(16), TickControl::Continue);

    assert_eq!(*player_hits.borrow(), vec![(EventTypeId::COLLISION, Some(enemy))]);
    assert_eq!(*enemy_hits.borrow(), vec![(EventTypeId::COLLISION, Some(player))]);
    assert!(engine.context().events.system_queue().is_empty());
}

#[test]
fn trigger_pair_waits_for_next_gameplay_drain() {
    let mut engine = engine();
    let coin = spawn(&mut engine, "level", 0, 0);
    let player = spawn(&mut engine, "level", 4, 0);
    collider(&mut engine, coin, "coin", false);
    collider(&mut engine, player, "player", false);
    engine.context_mut().collisions.enable_collision("coin", "player");
    let coin_hits = record(&mut engine, coin, EventTypeId::TRIGGER);

    engine.step(16);
    assert!(coin_hits.borrow().is_empty());
    assert_eq!(engine.context().events.native_queue().len(), 2);

    engine.context_mut().world.transform_mut(player).unwrap().move_by((100, 0), false);
    engine.step(16);

    assert_eq!(*coin_hits.borrow(), vec![(EventTypeId::TRIGGER, Some(player))]);
    assert!(engine.context().events.native_queue().is_empty());
}

#[test]
fn self_pair_emits_each_direction_once() {
    let mut engine = engine();
    let a = spawn(&mut engine, "level", 0, 0);
    let b = spawn(&mut engine, "level", 1, 1);
    collider(&mut engine, a, "crowd", true);
    collider(&mut engine, b, "crowd", true);
    engine.context_mut().collisions.enable_collision("crowd", "crowd");
    let a_hits = record(&mut engine, a, EventTypeId::COLLISION);
    let b_hits = record(&mut engine, b, EventTypeId::COLLISION);

    engine.step(16);

    assert_eq!(*a_hits.borrow(), vec![(EventTypeId::COLLISION, Some(b))]);
    assert_eq!(*b_hits.borrow(), vec![(EventTypeId::COLLISION, Some(a))]);
}

#[test]
fn colliders_sharing_an_owner_are_ignored() {
    let mut engine = engine();
    let ship = spawn(&mut engine, "level", 0, 0);
    collider(&mut engine, ship, "hull", true);
    collider(&mut engine, ship, "shield", true);
    engine.context_mut().collisions.enable_collision("hull", "shield");
    let hits = record(&mut engine, ship, EventTypeId::COLLISION);

    engine.step(16);

    assert!(hits.borrow().is_empty());
}

#[test]
fn inactive_scene_does_not_collide() {
    let mut engine = engine();
    let a = spawn(&mut engine, "lobby", 0, 0);
    let b = spawn(&mut engine, "lobby", 0, 0);
    collider(&mut engine, a, "l1", true);
    collider(&mut engine, b, "l2", true);
    engine.context_mut().collisions.enable_collision("l1", "l2");
    let hits = record(&mut engine, a, EventTypeId::COLLISION);

    engine.step(16);
    assert!(hits.borrow().is_empty());

    engine.context_mut().world.set_active_scene("lobby").unwrap();
    engine.step(16);
    assert_eq!(hits.borrow().len(), 1);
}

//=== Targeted Delivery ===================================================

#[test]
fn targeted_event_carries_listener_and_payload() {
    let mut engine = engine();
    let hero = spawn(&mut engine, "level", 0, 0);
    let seen: Rc<RefCell<Vec<Payload>>> = Rc::default();
    let sink = Rc::clone(&seen);
    engine.context_mut().events.register_event_hook(
        EventTypeId::NOTIFY,
        &hero,
        "seen",
        move |event: &Event, _: &mut EventContext<'_>| sink.borrow_mut().push(event.payload().clone()),
    );

    engine
        .sender()
        .send(EventTypeId::NOTIFY, Some(&[hero]), Payload::new().with("score", 10i64), false);
    engine.step(16);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("score").and_then(Value::as_int), Some(10));
    assert_eq!(seen[0].get("listener").and_then(Value::as_gameobject), Some(hero));
}

//=== Teardown ============================================================

#[test]
fn destroyed_object_receives_nothing() {
    let mut engine = engine();
    let hero = spawn(&mut engine, "level", 0, 0);
    let rock = spawn(&mut engine, "level", 0, 0);
    collider(&mut engine, hero, "hero", true);
    collider(&mut engine, rock, "rock", true);
    engine.context_mut().collisions.enable_collision("hero", "rock");
    let hits = record(&mut engine, hero, EventTypeId::NOTIFY);
    let rock_hits = record(&mut engine, rock, EventTypeId::COLLISION);

    assert!(engine.destroy_gameobject(hero));
    engine
        .sender()
        .send(EventTypeId::NOTIFY, Some(&[hero]), Payload::new(), false);
    engine.step(16);

    assert!(hits.borrow().is_empty());
    assert!(rock_hits.borrow().is_empty());
}

#[test]
fn removing_listeners_is_idempotent() {
    let mut engine = engine();
    let hero = spawn(&mut engine, "level", 0, 0);
    let hits = record(&mut engine, hero, EventTypeId::NOTIFY);

    engine.context_mut().events.remove_gameobject(hero);
    engine.context_mut().events.remove_gameobject(hero);
    engine
        .sender()
        .send(EventTypeId::NOTIFY, Some(&[hero]), Payload::new(), true);
    engine.step(16);

    assert!(hits.borrow().is_empty());
    assert!(engine.context().world.contains(hero));
}

//=== Listener Types ======================================================

struct Spike {
    source: GameObjectId,
    touched_by: Vec<GameObjectId>,
}

impl ListenerOwner for Spike {
    fn source(&self) -> GameObjectId {
        self.source
    }
}

impl EventListener for Spike {
    fn listener_table() -> ListenerTable<Self> {
        ListenerTable::new().listen(EventTypeId::COLLISION, Scope::Local, "on_touch", |spike: &mut Spike, event, ctx| {
            if let Some(other) = event.collides() {
                spike.touched_by.push(other);
                if let Some(t) = ctx.world.transform_mut(other) {
                    t.move_by((0, -32), false);
                }
            }
        })
    }
}

#[test]
fn constructed_listener_reacts_to_collisions() {
    let mut engine = engine();
    let spike_id = spawn(&mut engine, "level", 0, 0);
    let hero = spawn(&mut engine, "level", 4, 4);
    collider(&mut engine, spike_id, "hazard", true);
    collider(&mut engine, hero, "hero", true);
    engine.context_mut().collisions.enable_collision("hazard", "hero");

    let spike = engine.context_mut().construct_listener(Spike {
        source: spike_id,
        touched_by: Vec::new(),
    });
    engine.step(16);

    assert_eq!(spike.borrow().touched_by, vec![hero]);
    assert_eq!(engine.context().world.world_position(hero), Some((4, -28)));
}

//=== Quit ================================================================

#[test]
fn quit_broadcast_stops_the_frame_loop() {
    let mut engine = engine();
    let heard: Rc<RefCell<u32>> = Rc::default();
    let sink = Rc::clone(&heard);
    engine.context_mut().events.register_broadcast_hook(
        EventTypeId::QUIT,
        None,
        None,
        "quit",
        move |_: &Event, _: &mut EventContext<'_>| *sink.borrow_mut() += 1,
    );

    engine.sender().broadcast(EventTypeId::QUIT, Payload::new());

    assert_eq!(engine.step(16), TickControl::Exit);
    assert_eq!(*heard.borrow(), 1);
}
