mod commander;
mod entity;
mod group;
mod unit;

pub use commander::{Commander, EntityKind};
pub use entity::{CombatUnit, EntityMut, GroupMut, UnitMut};
pub use group::Group;
pub use unit::{Position, Unit, UnitId, UnitKind, STARTING_HP};
