use std::collections::HashMap;

use tracing::debug;

use super::entity::{render, CombatUnit, EntityMut, GroupMut, UnitMut};
use super::{Group, Unit, UnitId, UnitKind};
use crate::error::CombatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Unit(UnitKind),
    Group,
}

/// Factory and registry for every unit and group of a roster.
///
/// The commander owns all participants; callers hold [`UnitId`]s. The
/// id-taking capability methods are shorthands for [`Commander::entity_mut`]
/// followed by the matching [`CombatUnit`] call.
#[derive(Debug, Default)]
pub struct Commander {
    next_id: u64,
    created: Vec<UnitId>,
    pub(super) units: HashMap<UnitId, Unit>,
    pub(super) groups: HashMap<UnitId, Group>,
}

impl Commander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_warrior(&mut self) -> UnitId {
        self.spawn_unit(Unit::warrior())
    }

    pub fn create_spy(&mut self) -> UnitId {
        self.spawn_unit(Unit::spy())
    }

    pub fn create_wizard(&mut self) -> UnitId {
        self.spawn_unit(Unit::wizard())
    }

    pub fn create_group(&mut self) -> UnitId {
        let id = self.allocate();
        self.groups.insert(id, Group::new());
        debug!(%id, "created group");
        id
    }

    /// Every id created so far, in creation order.
    pub fn units(&self) -> &[UnitId] {
        &self.created
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn group(&self, id: UnitId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn kind_of(&self, id: UnitId) -> Option<EntityKind> {
        if let Some(unit) = self.units.get(&id) {
            return Some(EntityKind::Unit(unit.kind()));
        }
        self.groups.get(&id).map(|_| EntityKind::Group)
    }

    pub fn add(&mut self, group: UnitId, member: UnitId) -> Result<(), CombatError> {
        if self.kind_of(member).is_none() {
            return Err(CombatError::UnknownUnit(member));
        }
        self.group_ref(group)?;
        if member == group || self.reaches(member, group) {
            return Err(CombatError::Cycle { group, member });
        }
        self.group_mut(group)?.push(member);
        Ok(())
    }

    pub fn remove(&mut self, group: UnitId, member: UnitId) -> Result<(), CombatError> {
        if self.group_mut(group)?.remove_first(member) {
            Ok(())
        } else {
            Err(CombatError::NotAMember { group, member })
        }
    }

    /// Borrowing handle for `id`, leaf or group, through which every
    /// [`CombatUnit`] capability is driven.
    pub fn entity_mut(&mut self, id: UnitId) -> Result<EntityMut<'_>, CombatError> {
        match self.kind_of(id) {
            Some(EntityKind::Unit(_)) => Ok(EntityMut::Unit(UnitMut { commander: self, id })),
            Some(EntityKind::Group) => Ok(EntityMut::Group(GroupMut { commander: self, id })),
            None => Err(CombatError::UnknownUnit(id)),
        }
    }

    pub fn move_to(&mut self, id: UnitId, x: i64, y: i64) -> Result<(), CombatError> {
        self.entity_mut(id)?.move_to(x, y)
    }

    pub fn rest(&mut self, id: UnitId, amount: i64) -> Result<(), CombatError> {
        self.entity_mut(id)?.rest(amount)
    }

    pub fn take_damage(&mut self, id: UnitId, amount: i64) -> Result<(), CombatError> {
        self.entity_mut(id)?.take_damage(amount)
    }

    /// `attacker` strikes `target`; a group attacker has each member strike in
    /// turn.
    pub fn attack(&mut self, attacker: UnitId, target: UnitId) -> Result<(), CombatError> {
        self.entity_mut(attacker)?.attack(target)
    }

    pub fn display(&self, id: UnitId) -> Result<String, CombatError> {
        render(self, id)
    }

    fn spawn_unit(&mut self, unit: Unit) -> UnitId {
        let id = self.allocate();
        debug!(%id, kind = unit.kind().name(), "created unit");
        self.units.insert(id, unit);
        id
    }

    fn allocate(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.created.push(id);
        id
    }

    pub(super) fn group_ref(&self, id: UnitId) -> Result<&Group, CombatError> {
        match self.groups.get(&id) {
            Some(group) => Ok(group),
            None if self.units.contains_key(&id) => Err(CombatError::NotAGroup(id)),
            None => Err(CombatError::UnknownUnit(id)),
        }
    }

    fn group_mut(&mut self, id: UnitId) -> Result<&mut Group, CombatError> {
        if self.units.contains_key(&id) {
            return Err(CombatError::NotAGroup(id));
        }
        self.groups.get_mut(&id).ok_or(CombatError::UnknownUnit(id))
    }

    /// True when `needle` is nested somewhere below group `root`.
    fn reaches(&self, root: UnitId, needle: UnitId) -> bool {
        match self.groups.get(&root) {
            Some(group) => group
                .members()
                .iter()
                .any(|member| *member == needle || self.reaches(*member, needle)),
            None => false,
        }
    }
}
