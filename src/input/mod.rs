//! Typed input routing with explicit subscription handles.
//!
//! Producers call [`InputRouter::dispatch`]. Entities that carry an
//! [`InputSubscriptions`] component receive the actions they subscribed to
//! in their own queue, which [`route_actions`] drains into [`PendingActions`]
//! once per frame.

use std::collections::VecDeque;

use bevy::prelude::*;
use hashbrown::HashMap;

use crate::vector_math::normalize_input;

/// Kinds of action a subscriber can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputAction {
    /// Continuous 2D movement samples.
    Move,
    /// Grab or release a pushable body.
    Push,
    /// Jump edge.
    Jump,
    /// Toggle between the character and the book.
    ChangeMode,
}

/// A single input sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionInput {
    /// Movement on the ground plane; `y` maps to world Z.
    Move(Vec2),
    /// Push edge.
    Push,
    /// Jump edge.
    Jump,
    /// Mode toggle edge.
    ChangeMode,
}

impl ActionInput {
    /// The subscription kind this sample is delivered to.
    #[must_use]
    pub const fn action(&self) -> InputAction {
        match self {
            Self::Move(_) => InputAction::Move,
            Self::Push => InputAction::Push,
            Self::Jump => InputAction::Jump,
            Self::ChangeMode => InputAction::ChangeMode,
        }
    }
}

/// Handle returned by [`InputRouter::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Clone, Copy, Debug)]
struct Subscription {
    subscriber: Entity,
    action: InputAction,
}

/// Message bus between input producers and gameplay entities.
#[derive(Resource, Debug, Default)]
pub struct InputRouter {
    next_id: u64,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    queues: HashMap<Entity, VecDeque<ActionInput>>,
    move_sample: Vec2,
}

impl InputRouter {
    /// Subscribes `subscriber` to `action` and returns the release handle.
    pub fn subscribe(&mut self, subscriber: Entity, action: InputAction) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions
            .insert(id, Subscription { subscriber, action });
        id
    }

    /// Releases a subscription. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Drops every subscription and pending sample held by `subscriber`.
    pub fn release_all(&mut self, subscriber: Entity) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|_, s| s.subscriber != subscriber);
        self.queues.remove(&subscriber);
        before - self.subscriptions.len()
    }

    /// Actions `subscriber` currently listens for, sorted and deduplicated.
    #[must_use]
    pub fn actions_for(&self, subscriber: Entity) -> Vec<InputAction> {
        let mut actions: Vec<_> = self
            .subscriptions
            .values()
            .filter(|s| s.subscriber == subscriber)
            .map(|s| s.action)
            .collect();
        actions.sort_unstable();
        actions.dedup();
        actions
    }

    /// Delivers `input` to every matching subscriber.
    ///
    /// Move samples are normalized first and remembered as the current move
    /// sample even when nobody listens.
    pub fn dispatch(&mut self, input: ActionInput) {
        let routed = match input {
            ActionInput::Move(raw) => {
                let sample = normalize_input(raw);
                self.move_sample = sample;
                ActionInput::Move(sample)
            }
            other => other,
        };
        let action = routed.action();
        let mut targets: Vec<Entity> = self
            .subscriptions
            .values()
            .filter(|s| s.action == action)
            .map(|s| s.subscriber)
            .collect();
        targets.sort_unstable();
        targets.dedup();
        for subscriber in targets {
            self.queues.entry(subscriber).or_default().push_back(routed);
        }
    }

    /// Takes every queued sample for `subscriber`.
    pub fn drain(&mut self, subscriber: Entity) -> Vec<ActionInput> {
        self.queues
            .get_mut(&subscriber)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// Latest normalized move sample, delivered or not.
    #[must_use]
    pub const fn move_sample(&self) -> Vec2 {
        self.move_sample
    }
}

/// Subscriptions an entity wants, plus the handles it currently holds.
#[derive(Component, Clone, Debug, Default)]
pub struct InputSubscriptions {
    requested: Vec<InputAction>,
    held: Vec<(InputAction, SubscriptionId)>,
}

impl InputSubscriptions {
    /// Requests the given actions; they are acquired when the component is
    /// first seen by [`register_subscribers`].
    #[must_use]
    pub fn new(actions: &[InputAction]) -> Self {
        Self {
            requested: actions.to_vec(),
            held: Vec::new(),
        }
    }

    /// Acquires `actions` not already held.
    pub fn acquire(&mut self, router: &mut InputRouter, owner: Entity, actions: &[InputAction]) {
        for &action in actions {
            if !self.holds(action) {
                let id = router.subscribe(owner, action);
                self.held.push((action, id));
            }
        }
    }

    /// Releases the handles held for `actions`.
    pub fn release(&mut self, router: &mut InputRouter, actions: &[InputAction]) {
        self.held.retain(|(action, id)| {
            if actions.contains(action) {
                router.unsubscribe(*id);
                false
            } else {
                true
            }
        });
    }

    /// Whether a handle for `action` is held.
    #[must_use]
    pub fn holds(&self, action: InputAction) -> bool {
        self.held.iter().any(|(held, _)| *held == action)
    }
}

/// Per-frame actions drained from the router for one entity.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PendingActions {
    /// Most recent move sample delivered this frame.
    pub move_input: Option<Vec2>,
    /// Jump edge received.
    pub jump: bool,
    /// Push edge received.
    pub push: bool,
    /// Mode toggle edge received.
    pub change_mode: bool,
}

impl PendingActions {
    fn record(&mut self, input: ActionInput) {
        match input {
            ActionInput::Move(sample) => self.move_input = Some(sample),
            ActionInput::Push => self.push = true,
            ActionInput::Jump => self.jump = true,
            ActionInput::ChangeMode => self.change_mode = true,
        }
    }
}

/// Acquires the requested subscriptions of newly added subscribers.
pub fn register_subscribers(
    mut router: ResMut<InputRouter>,
    mut added: Query<(Entity, &mut InputSubscriptions), Added<InputSubscriptions>>,
) {
    for (entity, mut subs) in &mut added {
        let requested = subs.requested.clone();
        subs.acquire(&mut router, entity, &requested);
        log::debug!("{entity} subscribed to {requested:?}");
    }
}

/// Releases everything held by subscribers that lost the component or were
/// despawned.
pub fn release_removed_subscribers(
    mut router: ResMut<InputRouter>,
    mut removed: RemovedComponents<InputSubscriptions>,
) {
    for entity in removed.read() {
        let released = router.release_all(entity);
        log::debug!("released {released} subscriptions held by {entity}");
    }
}

/// Moves each subscriber's queued samples into its [`PendingActions`].
pub fn route_actions(mut router: ResMut<InputRouter>, mut pending: Query<(Entity, &mut PendingActions)>) {
    for (entity, mut actions) in &mut pending {
        *actions = PendingActions::default();
        for input in router.drain(entity) {
            actions.record(input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn router() -> InputRouter {
        InputRouter::default()
    }

    fn avatar() -> Entity {
        Entity::from_bits(11)
    }

    #[rstest]
    fn dispatch_reaches_only_subscribers(mut router: InputRouter) {
        let camera = Entity::from_bits(12);
        router.subscribe(avatar(), InputAction::Jump);
        router.subscribe(camera, InputAction::Move);
        router.dispatch(ActionInput::Jump);
        assert_eq!(router.drain(avatar()), vec![ActionInput::Jump]);
        assert!(router.drain(camera).is_empty());
    }

    #[rstest]
    fn move_samples_are_normalized(mut router: InputRouter) {
        router.subscribe(avatar(), InputAction::Move);
        router.dispatch(ActionInput::Move(Vec2::new(3.0, 4.0)));
        let expected = Vec2::new(0.6, 0.8);
        assert!((router.move_sample() - expected).length() < 1e-6);
        match router.drain(avatar()).as_slice() {
            [ActionInput::Move(v)] => assert!((*v - expected).length() < 1e-6),
            other => panic!("unexpected queue {other:?}"),
        }
    }

    #[rstest]
    fn unsubscribe_by_id_stops_delivery(mut router: InputRouter) {
        let id = router.subscribe(avatar(), InputAction::Push);
        assert!(router.unsubscribe(id));
        assert!(!router.unsubscribe(id));
        router.dispatch(ActionInput::Push);
        assert!(router.drain(avatar()).is_empty());
    }

    #[rstest]
    fn release_and_reacquire_restores_actions(mut router: InputRouter) {
        let all = [
            InputAction::Move,
            InputAction::Push,
            InputAction::Jump,
            InputAction::ChangeMode,
        ];
        let mut subs = InputSubscriptions::new(&all);
        subs.acquire(&mut router, avatar(), &all);
        let original = router.actions_for(avatar());

        let movement = [InputAction::Move, InputAction::Push, InputAction::Jump];
        subs.release(&mut router, &movement);
        assert_eq!(router.actions_for(avatar()), vec![InputAction::ChangeMode]);

        subs.acquire(&mut router, avatar(), &movement);
        assert_eq!(router.actions_for(avatar()), original);
    }

    #[rstest]
    fn acquire_is_idempotent(mut router: InputRouter) {
        let mut subs = InputSubscriptions::default();
        subs.acquire(&mut router, avatar(), &[InputAction::Jump]);
        subs.acquire(&mut router, avatar(), &[InputAction::Jump]);
        router.dispatch(ActionInput::Jump);
        assert_eq!(router.drain(avatar()).len(), 1);
    }

    #[test]
    fn subscriptions_follow_component_lifecycle() {
        let mut app = App::new();
        app.init_resource::<InputRouter>();
        app.add_systems(Update, (register_subscribers, release_removed_subscribers));
        let entity = app
            .world_mut()
            .spawn(InputSubscriptions::new(&[InputAction::Move, InputAction::Jump]))
            .id();
        app.update();
        assert_eq!(
            app.world().resource::<InputRouter>().actions_for(entity),
            vec![InputAction::Move, InputAction::Jump]
        );

        app.world_mut().entity_mut(entity).despawn();
        app.update();
        assert!(app
            .world()
            .resource::<InputRouter>()
            .actions_for(entity)
            .is_empty());
    }
}
