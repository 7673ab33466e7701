//=========================================================================
// System Controller
//=========================================================================
//
// Drives one frame over the GlobalContext.
//
// Frame order:
//   1. EventDrain                  gameplay events (native queue)
//   2. CollisionPass(COLLISION)    solid colliders, system events
//   3. CollisionPass(TRIGGER)      trigger colliders, gameplay events
//   after each hook: system queue drain
//   4. extended systems, in attach order
//
// Solid-collision events are therefore delivered within the frame that
// detected them; trigger events wait for the next frame's EventDrain.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::event::EventTypeId;
use crate::core::scene::GameObjectId;
use crate::core::TickControl;

//=== SequenceHook ========================================================

/// One step of the core frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceHook {
    /// Dispatch the native queue snapshot.
    EventDrain,

    /// Run the collision pass that emits this event type.
    CollisionPass(EventTypeId),
}

impl SequenceHook {
    fn run(self, ctx: &mut GlobalContext, dt: u64) -> TickControl {
        match self {
            SequenceHook::EventDrain => ctx.events.update(&mut ctx.world, dt),
            SequenceHook::CollisionPass(kind) => {
                ctx.collisions
                    .handle_collisions(dt, kind, &ctx.world, ctx.events.sender());
                TickControl::Continue
            }
        }
    }
}

//=== System ==============================================================

/// An extended system updated after the core sequence.
pub trait System {
    fn update(&mut self, ctx: &mut GlobalContext, dt: u64);

    /// Drops any state held for `gameobject`.
    fn remove_gameobject(&mut self, _gameobject: GameObjectId) {}
}

//=== SystemController ====================================================

/// Owns the frame sequence and the attached extended systems.
pub struct SystemController {
    sequence: Vec<SequenceHook>,
    systems: Vec<Box<dyn System>>,
}

impl SystemController {
    pub fn new() -> Self {
        Self {
            sequence: vec![
                SequenceHook::EventDrain,
                SequenceHook::CollisionPass(EventTypeId::COLLISION),
                SequenceHook::CollisionPass(EventTypeId::TRIGGER),
            ],
            systems: Vec::new(),
        }
    }

    pub fn sequence(&self) -> &[SequenceHook] {
        &self.sequence
    }

    /// Attaches a system, updated after those attached before it.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        debug!("Attached extended system #{}", self.systems.len());
        self.systems.push(system);
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one frame. Returns `Exit` once a quit event was dispatched;
    /// the rest of the frame still runs.
    ///
    /// Destroy requests made by hooks are applied after every drain.
    pub fn update(&mut self, ctx: &mut GlobalContext, dt: u64) -> TickControl {
        let mut control = TickControl::Continue;

        for index in 0..self.sequence.len() {
            let hook = self.sequence[index];
            trace!("Sequence hook {:?}", hook);
            control = control.merge(hook.run(ctx, dt));
            self.apply_destroyed(ctx);
            control = control.merge(ctx.events.update_system(&mut ctx.world, dt));
            self.apply_destroyed(ctx);
        }

        for system in &mut self.systems {
            system.update(ctx, dt);
        }

        control
    }

    //--- Teardown ---------------------------------------------------------

    /// Destroys `gameobject` in the context and every extended system.
    pub fn destroy_gameobject(&mut self, ctx: &mut GlobalContext, gameobject: GameObjectId) -> bool {
        if !ctx.destroy_gameobject(gameobject) {
            return false;
        }
        for system in &mut self.systems {
            system.remove_gameobject(gameobject);
        }
        true
    }

    fn apply_destroyed(&mut self, ctx: &mut GlobalContext) {
        for gameobject in ctx.events.take_destroyed() {
            self.destroy_gameobject(ctx, gameobject);
        }
    }
}

impl Default for SystemController {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collision::{Collider, Rect};
    use crate::core::event::{Event, EventContext, Payload};
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<EventTypeId>>>;

    fn context() -> GlobalContext {
        let mut ctx = GlobalContext::new(64);
        ctx.world.register_scene("main");
        ctx.world.set_active_scene("main").unwrap();
        ctx
    }

    fn record(ctx: &mut GlobalContext, id: GameObjectId, kind: EventTypeId, log: &Log) {
        let log = Rc::clone(log);
        ctx.events
            .register_event_hook(kind, &id, "record", move |event: &Event, _: &mut EventContext<'_>| {
                log.borrow_mut().push(event.kind())
            });
    }

    struct Counter {
        updates: Rc<RefCell<u32>>,
        removed: Rc<RefCell<Vec<GameObjectId>>>,
    }

    impl System for Counter {
        fn update(&mut self, _ctx: &mut GlobalContext, _dt: u64) {
            *self.updates.borrow_mut() += 1;
        }

        fn remove_gameobject(&mut self, gameobject: GameObjectId) {
            self.removed.borrow_mut().push(gameobject);
        }
    }

    //--- Sequence ---------------------------------------------------------

    #[test]
    fn default_sequence_runs_collision_before_trigger() {
        let controller = SystemController::new();
        assert_eq!(
            controller.sequence(),
            &[
                SequenceHook::EventDrain,
                SequenceHook::CollisionPass(EventTypeId::COLLISION),
                SequenceHook::CollisionPass(EventTypeId::TRIGGER),
            ]
        );
    }

    #[test]
    fn solid_collision_is_delivered_same_frame() {
        let mut ctx = context();
        let log: Log = Rc::default();
        let a = ctx.world.spawn("main", "a").unwrap();
        let b = ctx.world.spawn("main", "b").unwrap();
        record(&mut ctx, a, EventTypeId::COLLISION, &log);
        ctx.spawn_collider(Collider::new(a, Rect::new(0, 0, 8, 8), ["l1"], true).unwrap())
            .unwrap();
        ctx.spawn_collider(Collider::new(b, Rect::new(0, 0, 8, 8), ["l2"], true).unwrap())
            .unwrap();
        ctx.collisions.enable_collision("l1", "l2");

        let mut controller = SystemController::new();
        controller.update(&mut ctx, 16);

        assert_eq!(*log.borrow(), vec![EventTypeId::COLLISION]);
    }

    #[test]
    fn trigger_is_delivered_next_frame() {
        let mut ctx = context();
        let log: Log = Rc::default();
        let a = ctx.world.spawn("main", "a").unwrap();
        let b = ctx.world.spawn("main", "b").unwrap();
        record(&mut ctx, a, EventTypeId::TRIGGER, &log);
        ctx.spawn_collider(Collider::new(a, Rect::new(0, 0, 8, 8), ["l1"], false).unwrap())
            .unwrap();
        ctx.spawn_collider(Collider::new(b, Rect::new(0, 0, 8, 8), ["l2"], false).unwrap())
            .unwrap();
        ctx.collisions.enable_collision("l1", "l2");

        let mut controller = SystemController::new();
        controller.update(&mut ctx, 16);
        assert!(log.borrow().is_empty());

        controller.destroy_gameobject(&mut ctx, b);
        controller.update(&mut ctx, 16);
        assert_eq!(*log.borrow(), vec![EventTypeId::TRIGGER]);
    }

    #[test]
    fn hook_can_destroy_its_own_entity() {
        let mut ctx = context();
        let bullet = ctx.world.spawn("main", "bullet").unwrap();
        let wall = ctx.world.spawn("main", "wall").unwrap();
        ctx.spawn_collider(Collider::new(bullet, Rect::new(0, 0, 4, 4), ["bullet"], false).unwrap())
            .unwrap();
        ctx.spawn_collider(Collider::new(wall, Rect::new(0, 0, 32, 32), ["wall"], false).unwrap())
            .unwrap();
        ctx.collisions.enable_collision("bullet", "wall");
        ctx.events.register_event_hook(
            EventTypeId::TRIGGER,
            &bullet,
            "explode",
            move |_: &Event, ctx: &mut EventContext<'_>| ctx.destroy(bullet),
        );

        let mut controller = SystemController::new();
        for _ in 0..3 {
            controller.update(&mut ctx, 16);
        }

        assert!(!ctx.world.contains(bullet));
        assert!(ctx.collisions.layer("bullet").is_empty());
        assert_eq!(ctx.collisions.len(), 1);
        assert!(ctx.events.listeners_mut().is_empty());
        assert!(ctx.events.native_queue().is_empty());
    }

    #[test]
    fn quit_exits_after_full_frame() {
        let mut ctx = context();
        let updates = Rc::new(RefCell::new(0));
        let mut controller = SystemController::new();
        controller.add_system(Box::new(Counter {
            updates: Rc::clone(&updates),
            removed: Rc::default(),
        }));

        ctx.events.broadcast(EventTypeId::QUIT, Payload::new());

        assert_eq!(controller.update(&mut ctx, 16), TickControl::Exit);
        assert_eq!(*updates.borrow(), 1);
        assert_eq!(controller.update(&mut ctx, 16), TickControl::Continue);
    }

    #[test]
    fn destroy_reaches_extended_systems() {
        let mut ctx = context();
        let removed = Rc::new(RefCell::new(Vec::new()));
        let mut controller = SystemController::new();
        controller.add_system(Box::new(Counter {
            updates: Rc::default(),
            removed: Rc::clone(&removed),
        }));
        let id = ctx.world.spawn("main", "doomed").unwrap();

        assert!(controller.destroy_gameobject(&mut ctx, id));
        assert!(!controller.destroy_gameobject(&mut ctx, id));

        assert_eq!(*removed.borrow(), vec![id]);
    }
}
