//! Unit notifications
//!
//! Observers subscribe to the three notification streams a unit emits (death,
//! state change, attack). Callbacks run synchronously, in the order they were
//! registered, at the point the simulation describes the event.

use smallvec::SmallVec;

use crate::units::{Team, UnitId, UnitState};

/// Fired once when a unit dies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDied {
    pub unit: UnitId,
    pub team: Team,
    /// Last unit that damaged the victim, if any
    pub killer: Option<UnitId>,
}

/// Fired after a unit has entered a new lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub unit: UnitId,
    pub state: UnitState,
}

/// Fired after an auto-attack has landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPerformed {
    pub unit: UnitId,
    pub target: UnitId,
}

/// Handle returned by [`ObserverList::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send + Sync>;

/// Ordered list of callbacks for one notification type.
pub struct ObserverList<E> {
    next_id: u64,
    callbacks: SmallVec<[(SubscriptionId, Callback<E>); 4]>,
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: SmallVec::new(),
        }
    }
}

impl<E> ObserverList<E> {
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// All notification streams exposed by the battle world.
#[derive(Default)]
pub struct UnitObservers {
    pub on_unit_death: ObserverList<UnitDied>,
    pub on_state_changed: ObserverList<StateChanged>,
    pub on_attack: ObserverList<AttackPerformed>,
}
