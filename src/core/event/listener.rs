//=========================================================================
// Listener Registration Protocol
//=========================================================================
//
// Declarative method tagging, resolved into live registrations when an
// instance is constructed.
//
// Architecture:
//   T::listener_table() ──register::<T>()──► HashMap<TypeId, ListenerTable<T>>
//                                                  │
//   construct(value) ── Rc<RefCell<T>> ── bind ────┘──► EventSystem
//
// Tables are additive across "inheritance": a derived table starts with
// every tag of its bases, followed by its own. Tags are never
// deduplicated by name, and each tag resolves to the most derived method
// of that name. Re-tagging an overridden method therefore fires the
// override once per tag.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Event, EventContext, EventSystem, EventTypeId, Scope};
use crate::core::scene::{ListenerOwner, World};

//=== EventListener =======================================================

/// Types whose methods are registered with the event system on construction.
///
/// # Example
///
/// ```rust
/// use relay_engine::prelude::*;
///
/// struct Door {
///     source: GameObjectId,
///     opened: bool,
/// }
///
/// impl ListenerOwner for Door {
///     fn source(&self) -> GameObjectId {
///         self.source
///     }
/// }
///
/// impl EventListener for Door {
///     fn listener_table() -> ListenerTable<Self> {
///         ListenerTable::new().listen(EventTypeId::TRIGGER, Scope::Local, "open", |door: &mut Door, _, _| {
///             door.opened = true;
///         })
///     }
/// }
/// ```
pub trait EventListener: ListenerOwner + Sized + 'static {
    /// Builds the tag table for this type. Called once per type.
    fn listener_table() -> ListenerTable<Self>;
}

//=== ListenerTable =======================================================

type Method<T> = Rc<dyn Fn(&mut T, &Event, &mut EventContext<'_>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag {
    kind: EventTypeId,
    scope: Scope,
    name: &'static str,
}

/// Ordered `(event type, scope, method)` tags for one listener type.
pub struct ListenerTable<T> {
    tags: Vec<Tag>,
    inherited: usize,
    methods: HashMap<&'static str, Method<T>>,
}

impl<T: 'static> ListenerTable<T> {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            inherited: 0,
            methods: HashMap::new(),
        }
    }

    /// Tags `method` as a listener for `kind` under `scope`.
    ///
    /// Defining a name that already exists overrides the method for every
    /// tag carrying that name, inherited ones included.
    pub fn listen<F>(mut self, kind: EventTypeId, scope: Scope, name: &'static str, method: F) -> Self
    where
        F: Fn(&mut T, &Event, &mut EventContext<'_>) + 'static,
    {
        self.tags.push(Tag { kind, scope, name });
        self.methods.insert(name, Rc::new(method));
        self
    }

    /// Replaces the method behind `name` without adding a tag.
    pub fn override_method<F>(mut self, name: &'static str, method: F) -> Self
    where
        F: Fn(&mut T, &Event, &mut EventContext<'_>) + 'static,
    {
        self.methods.insert(name, Rc::new(method));
        self
    }

    /// Copies every tag of `base` ahead of this table's own tags.
    ///
    /// `project` reaches the embedded base value. Methods already defined
    /// on this table keep precedence over the base's.
    pub fn inherit<B: 'static>(mut self, base: ListenerTable<B>, project: fn(&mut T) -> &mut B) -> Self {
        let count = base.tags.len();
        self.tags.splice(self.inherited..self.inherited, base.tags);
        self.inherited += count;

        for (name, method) in base.methods {
            self.methods.entry(name).or_insert_with(|| {
                Rc::new(move |this: &mut T, event: &Event, context: &mut EventContext<'_>| {
                    method(project(this), event, context)
                })
            });
        }
        self
    }

    /// Tags in registration order as `(event type, scope, method name)`.
    pub fn tags(&self) -> impl Iterator<Item = (EventTypeId, Scope, &'static str)> + '_ {
        self.tags.iter().map(|t| (t.kind, t.scope, t.name))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    //--- Binding ----------------------------------------------------------

    /// Registers every tag of this table for `instance`.
    fn bind(&self, instance: &Rc<RefCell<T>>, events: &mut EventSystem, world: &World)
    where
        T: ListenerOwner,
    {
        let source = instance.borrow().source();

        for tag in &self.tags {
            let Some(method) = self.methods.get(tag.name) else {
                warn!(target: "events", "No method named '{}' for tag {}", tag.name, tag.kind);
                continue;
            };

            let hook = bound_hook(Rc::clone(instance), Rc::clone(method), tag.name);

            match tag.scope {
                Scope::Local => {
                    events.register_event_hook(tag.kind, &source, tag.name, hook);
                }
                Scope::BroadcastScene => match world.scene_of(source) {
                    Some(scene) => {
                        events.register_broadcast_hook(tag.kind, Some(scene), Some(source), tag.name, hook);
                    }
                    None => warn!(
                        target: "events",
                        "Cannot bind '{}': {:?} belongs to no scene",
                        tag.name,
                        source
                    ),
                },
                Scope::Broadcast => {
                    events.register_broadcast_hook(tag.kind, None, Some(source), tag.name, hook);
                }
            }
        }
    }
}

impl<T: 'static> Default for ListenerTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn bound_hook<T: 'static>(
    instance: Rc<RefCell<T>>,
    method: Method<T>,
    name: &'static str,
) -> impl FnMut(&Event, &mut EventContext<'_>) + 'static {
    move |event: &Event, context: &mut EventContext<'_>| match instance.try_borrow_mut() {
        Ok(mut this) => method(&mut this, event, context),
        Err(_) => warn!(target: "events", "Listener '{}' is already borrowed, skipping {}", name, event.kind()),
    }
}

//=== ListenerRegistry ====================================================

/// Per-type listener tables, built once per concrete type.
#[derive(Default)]
pub struct ListenerRegistry {
    tables: HashMap<TypeId, Box<dyn Any>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and stores the table for `T`. Repeated calls are no-ops.
    pub fn register<T: EventListener>(&mut self) -> &ListenerTable<T> {
        let boxed = self.tables.entry(TypeId::of::<T>()).or_insert_with(|| {
            let table = T::listener_table();
            debug!(
                target: "events",
                "Registered listener type {} with {} tag(s)",
                std::any::type_name::<T>(),
                table.len()
            );
            Box::new(table)
        });

        boxed
            .downcast_ref::<ListenerTable<T>>()
            .expect("Type mismatch in ListenerRegistry")
    }

    /// The stored table for `T`, if registered.
    pub fn table<T: EventListener>(&self) -> Option<&ListenerTable<T>> {
        self.tables
            .get(&TypeId::of::<T>())
            .and_then(|t| t.downcast_ref::<ListenerTable<T>>())
    }

    pub fn is_registered<T: EventListener>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<T>())
    }

    /// Wraps `value` and registers its tagged methods.
    ///
    /// This is the post-construction step: call it once the value is fully
    /// built. Unregistered types are registered on the fly.
    pub fn construct<T: EventListener>(
        &mut self,
        value: T,
        events: &mut EventSystem,
        world: &World,
    ) -> Rc<RefCell<T>> {
        let instance = Rc::new(RefCell::new(value));
        self.register::<T>().bind(&instance, events, world);
        instance
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Payload, RoutingTarget};
    use crate::core::scene::{ComponentRef, GameObjectId};

    //--- Fixtures ---------------------------------------------------------

    struct Base {
        source: GameObjectId,
        hits: Vec<&'static str>,
    }

    impl ListenerOwner for Base {
        fn source(&self) -> GameObjectId {
            self.source
        }
    }

    impl EventListener for Base {
        fn listener_table() -> ListenerTable<Self> {
            ListenerTable::new().listen(EventTypeId::COLLISION, Scope::Local, "on_collision", |b: &mut Base, _, _| {
                b.hits.push("base")
            })
        }
    }

    struct Derived {
        base: Base,
    }

    impl ListenerOwner for Derived {
        fn source(&self) -> GameObjectId {
            self.base.source
        }
    }

    impl EventListener for Derived {
        fn listener_table() -> ListenerTable<Self> {
            ListenerTable::new()
                .inherit(Base::listener_table(), |d: &mut Derived| &mut d.base)
                .listen(EventTypeId::COLLISION, Scope::Local, "on_collision", |d: &mut Derived, _, _| {
                    d.base.hits.push("derived")
                })
        }
    }

    struct Quiet {
        base: Base,
    }

    impl ListenerOwner for Quiet {
        fn source(&self) -> GameObjectId {
            self.base.source
        }
    }

    impl EventListener for Quiet {
        fn listener_table() -> ListenerTable<Self> {
            ListenerTable::new()
                .inherit(Base::listener_table(), |q: &mut Quiet| &mut q.base)
                .override_method("on_collision", |q: &mut Quiet, _, _| q.base.hits.push("quiet"))
        }
    }

    struct Announcer {
        component: ComponentRef,
        heard: u32,
    }

    impl ListenerOwner for Announcer {
        fn source(&self) -> GameObjectId {
            self.component.source()
        }
    }

    impl EventListener for Announcer {
        fn listener_table() -> ListenerTable<Self> {
            ListenerTable::new()
                .listen(EventTypeId::NOTIFY, Scope::Broadcast, "global", |a: &mut Announcer, _, _| a.heard += 1)
                .listen(EventTypeId::NOTIFY, Scope::BroadcastScene, "scene", |a: &mut Announcer, _, _| {
                    a.heard += 10
                })
        }
    }

    fn setup() -> (World, EventSystem, ListenerRegistry, GameObjectId) {
        let mut world = World::new();
        world.register_scene("level");
        world.set_active_scene("level").unwrap();
        let id = world.spawn("level", "hero").unwrap();
        (world, EventSystem::new(64), ListenerRegistry::new(), id)
    }

    fn collide(events: &EventSystem, id: GameObjectId) {
        events.send(EventTypeId::COLLISION, Some(&[id]), Payload::new(), false);
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn derived_table_accumulates_base_tags_first() {
        let table = Derived::listener_table();
        let tags: Vec<_> = table.tags().map(|(_, _, name)| name).collect();
        assert_eq!(tags, vec!["on_collision", "on_collision"]);
    }

    #[test]
    fn retagged_override_fires_once_per_tag() {
        let (mut world, mut events, mut registry, id) = setup();
        let derived = registry.construct(
            Derived { base: Base { source: id, hits: vec![] } },
            &mut events,
            &world,
        );

        collide(&events, id);
        events.update(&mut world, 16);

        assert_eq!(derived.borrow().base.hits, vec!["derived", "derived"]);
    }

    #[test]
    fn untagged_override_replaces_base_method() {
        let (mut world, mut events, mut registry, id) = setup();
        let quiet = registry.construct(
            Quiet { base: Base { source: id, hits: vec![] } },
            &mut events,
            &world,
        );

        collide(&events, id);
        events.update(&mut world, 16);

        assert_eq!(quiet.borrow().base.hits, vec!["quiet"]);
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = ListenerRegistry::new();
        assert!(!registry.is_registered::<Base>());
        assert_eq!(registry.register::<Base>().len(), 1);
        assert_eq!(registry.register::<Base>().len(), 1);
        assert!(registry.table::<Base>().is_some());
    }

    #[test]
    fn broadcast_scopes_bind_to_none_and_owner_scene() {
        let (mut world, mut events, mut registry, id) = setup();
        let announcer = registry.construct(
            Announcer { component: ComponentRef::new(id, 0), heard: 0 },
            &mut events,
            &world,
        );

        events.broadcast(EventTypeId::NOTIFY, Payload::new());
        events.update(&mut world, 16);
        assert_eq!(announcer.borrow().heard, 1);

        events.broadcast_scene(&world, EventTypeId::NOTIFY, "level", Payload::new(), false);
        events.update(&mut world, 16);
        assert_eq!(announcer.borrow().heard, 11);
    }

    #[test]
    fn scene_scope_without_scene_is_skipped() {
        let (world, mut events, mut registry, _) = setup();
        let orphan = GameObjectId::from_raw(999);
        registry.construct(
            Announcer { component: ComponentRef::new(orphan, 0), heard: 0 },
            &mut events,
            &world,
        );

        // only the global tag could bind
        let global = Event::new(EventTypeId::NOTIFY, Payload::new(), RoutingTarget::Broadcast);
        assert_eq!(events.listeners_mut().count_for(&global), 1);
        assert_eq!(events.listeners_mut().len(), 1);
    }
}
