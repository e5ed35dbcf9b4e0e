use std::fmt;

use crate::error::CombatError;

pub const STARTING_HP: i64 = 100;

/// Handle issued by the [`Commander`](super::Commander) for every unit and group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub(crate) u64);

impl UnitId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Warrior,
    Spy,
    Wizard,
}

impl UnitKind {
    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Warrior => "Warrior",
            UnitKind::Spy => "Spy",
            UnitKind::Wizard => "Wizard",
        }
    }

    pub fn attack_damage(self) -> i64 {
        match self {
            UnitKind::Warrior => 10,
            UnitKind::Spy => 6,
            UnitKind::Wizard => 8,
        }
    }

    pub fn experience_gain(self) -> i64 {
        match self {
            UnitKind::Warrior => 5,
            UnitKind::Spy => 7,
            UnitKind::Wizard => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    kind: UnitKind,
    hp: i64,
    xp: i64,
    position: Position,
}

impl Unit {
    pub fn new(kind: UnitKind) -> Self {
        Self {
            kind,
            hp: STARTING_HP,
            xp: 0,
            position: Position::default(),
        }
    }

    pub fn warrior() -> Self {
        Self::new(UnitKind::Warrior)
    }

    pub fn spy() -> Self {
        Self::new(UnitKind::Spy)
    }

    pub fn wizard() -> Self {
        Self::new(UnitKind::Wizard)
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn hp(&self) -> i64 {
        self.hp
    }

    pub fn xp(&self) -> i64 {
        self.xp
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn gain_experience(&mut self) {
        self.xp += self.kind.experience_gain();
    }

    /// Sets the absolute position.
    pub fn move_to(&mut self, x: i64, y: i64) {
        self.position = Position::new(x, y);
    }

    pub fn rest(&mut self, amount: i64) -> Result<(), CombatError> {
        reject_negative("rest", amount)?;
        self.hp += amount;
        Ok(())
    }

    pub fn take_damage(&mut self, amount: i64) -> Result<(), CombatError> {
        reject_negative("damage", amount)?;
        self.hp = (self.hp - amount).max(0);
        Ok(())
    }

    pub fn display(&self) -> String {
        format!(
            "{}(hp={}, xp={}, pos=({},{}))",
            self.kind.name(),
            self.hp,
            self.xp,
            self.position.x,
            self.position.y
        )
    }
}

fn reject_negative(operation: &'static str, amount: i64) -> Result<(), CombatError> {
    if amount < 0 {
        return Err(CombatError::NegativeAmount { operation, amount });
    }
    Ok(())
}
