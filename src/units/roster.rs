//! Unit registry
//!
//! Owns every unit on the board and bench. Units are kept in spawn order so
//! that iteration (and therefore target tie-breaking) is deterministic.

use smallvec::SmallVec;

use super::stats::{Team, Unit, UnitId, UnitStats};

/// Read-only view of "all units", used by targeting.
pub trait RosterQuery {
    fn all_units(&self) -> SmallVec<[&Unit; 16]>;

    fn find(&self, id: UnitId) -> Option<&Unit>;
}

#[derive(Debug, Clone, Default)]
pub struct UnitRoster {
    next_id: u32,
    units: Vec<Unit>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id and add a benched unit built from `stats`.
    pub fn spawn(&mut self, stats: &UnitStats, team: Team) -> UnitId {
        let id = self.allocate_id();
        self.units.push(Unit::new(id, stats, team));
        id
    }

    /// Add a unit built by the caller. Its id is replaced with a fresh one.
    pub fn insert(&mut self, mut unit: Unit) -> UnitId {
        let id = self.allocate_id();
        unit.id = id;
        self.units.push(unit);
        id
    }

    fn allocate_id(&mut self) -> UnitId {
        let id = UnitId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Remove a unit for good. Outstanding ids to it resolve to `None` afterwards.
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.id == id)?;
        Some(self.units.remove(index))
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in spawn order
    pub fn ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    pub fn team(&self, team: Team) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.team == team)
    }

    pub fn alive_count(&self, team: Team) -> usize {
        self.team(team).filter(|u| u.is_alive).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl RosterQuery for UnitRoster {
    fn all_units(&self) -> SmallVec<[&Unit; 16]> {
        self.units.iter().collect()
    }

    fn find(&self, id: UnitId) -> Option<&Unit> {
        self.get(id)
    }
}
