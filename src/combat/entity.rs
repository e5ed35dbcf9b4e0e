use super::{Commander, Unit, UnitId};
use crate::error::CombatError;

/// Capabilities shared by every combat participant, leaf or group.
///
/// Implemented by the borrowing handles that [`Commander::entity_mut`] hands
/// out, so a group and a single unit are driven through the same calls.
pub trait CombatUnit {
    /// Sets the absolute position.
    fn move_to(&mut self, x: i64, y: i64) -> Result<(), CombatError>;
    fn rest(&mut self, amount: i64) -> Result<(), CombatError>;
    fn take_damage(&mut self, amount: i64) -> Result<(), CombatError>;
    /// Strikes `target`. Self-attack is allowed.
    fn attack(&mut self, target: UnitId) -> Result<(), CombatError>;
    fn display(&self) -> Result<String, CombatError>;
}

/// Mutable view of one leaf unit inside a [`Commander`].
pub struct UnitMut<'a> {
    pub(super) commander: &'a mut Commander,
    pub(super) id: UnitId,
}

/// Mutable view of one group inside a [`Commander`]. Operations broadcast to
/// members in insertion order; a failing member aborts the broadcast without
/// undoing the members already handled.
pub struct GroupMut<'a> {
    pub(super) commander: &'a mut Commander,
    pub(super) id: UnitId,
}

pub enum EntityMut<'a> {
    Unit(UnitMut<'a>),
    Group(GroupMut<'a>),
}

impl UnitMut<'_> {
    pub fn id(&self) -> UnitId {
        self.id
    }

    fn unit(&mut self) -> Result<&mut Unit, CombatError> {
        self.commander
            .units
            .get_mut(&self.id)
            .ok_or(CombatError::UnknownUnit(self.id))
    }
}

impl CombatUnit for UnitMut<'_> {
    fn move_to(&mut self, x: i64, y: i64) -> Result<(), CombatError> {
        self.unit()?.move_to(x, y);
        Ok(())
    }

    fn rest(&mut self, amount: i64) -> Result<(), CombatError> {
        self.unit()?.rest(amount)
    }

    fn take_damage(&mut self, amount: i64) -> Result<(), CombatError> {
        self.unit()?.take_damage(amount)
    }

    // Experience is only granted once the damage landed.
    fn attack(&mut self, target: UnitId) -> Result<(), CombatError> {
        let damage = self.unit()?.kind().attack_damage();
        self.commander.entity_mut(target)?.take_damage(damage)?;
        self.unit()?.gain_experience();
        Ok(())
    }

    fn display(&self) -> Result<String, CombatError> {
        render(self.commander, self.id)
    }
}

impl GroupMut<'_> {
    pub fn id(&self) -> UnitId {
        self.id
    }

    fn members(&self) -> Result<Vec<UnitId>, CombatError> {
        Ok(self.commander.group_ref(self.id)?.members().to_vec())
    }
}

impl CombatUnit for GroupMut<'_> {
    fn move_to(&mut self, x: i64, y: i64) -> Result<(), CombatError> {
        for member in self.members()? {
            self.commander.entity_mut(member)?.move_to(x, y)?;
        }
        Ok(())
    }

    fn rest(&mut self, amount: i64) -> Result<(), CombatError> {
        for member in self.members()? {
            self.commander.entity_mut(member)?.rest(amount)?;
        }
        Ok(())
    }

    fn take_damage(&mut self, amount: i64) -> Result<(), CombatError> {
        let share = match self.commander.group_ref(self.id)?.damage_share(amount) {
            Some(share) => share,
            None => return Ok(()),
        };
        for member in self.members()? {
            self.commander.entity_mut(member)?.take_damage(share)?;
        }
        Ok(())
    }

    fn attack(&mut self, target: UnitId) -> Result<(), CombatError> {
        for member in self.members()? {
            self.commander.entity_mut(member)?.attack(target)?;
        }
        Ok(())
    }

    fn display(&self) -> Result<String, CombatError> {
        render(self.commander, self.id)
    }
}

impl EntityMut<'_> {
    pub fn id(&self) -> UnitId {
        match self {
            EntityMut::Unit(unit) => unit.id(),
            EntityMut::Group(group) => group.id(),
        }
    }
}

impl CombatUnit for EntityMut<'_> {
    fn move_to(&mut self, x: i64, y: i64) -> Result<(), CombatError> {
        match self {
            EntityMut::Unit(unit) => unit.move_to(x, y),
            EntityMut::Group(group) => group.move_to(x, y),
        }
    }

    fn rest(&mut self, amount: i64) -> Result<(), CombatError> {
        match self {
            EntityMut::Unit(unit) => unit.rest(amount),
            EntityMut::Group(group) => group.rest(amount),
        }
    }

    fn take_damage(&mut self, amount: i64) -> Result<(), CombatError> {
        match self {
            EntityMut::Unit(unit) => unit.take_damage(amount),
            EntityMut::Group(group) => group.take_damage(amount),
        }
    }

    fn attack(&mut self, target: UnitId) -> Result<(), CombatError> {
        match self {
            EntityMut::Unit(unit) => unit.attack(target),
            EntityMut::Group(group) => group.attack(target),
        }
    }

    fn display(&self) -> Result<String, CombatError> {
        match self {
            EntityMut::Unit(unit) => unit.display(),
            EntityMut::Group(group) => group.display(),
        }
    }
}

/// Text form of `id`: a leaf's own description, or `[a, b, ...]` for a group.
pub(super) fn render(commander: &Commander, id: UnitId) -> Result<String, CombatError> {
    if let Some(unit) = commander.units.get(&id) {
        return Ok(unit.display());
    }
    let parts = commander
        .group_ref(id)?
        .members()
        .iter()
        .map(|member| render(commander, *member))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", parts.join(", ")))
}
