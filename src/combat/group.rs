use super::UnitId;

/// Ordered membership of a composite unit. Members are ids resolved by the
/// owning [`Commander`](super::Commander); duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    members: Vec<UnitId>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[UnitId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: UnitId) -> bool {
        self.members.contains(&member)
    }

    pub(crate) fn push(&mut self, member: UnitId) {
        self.members.push(member);
    }

    /// Drops the first occurrence of `member`. Returns false when absent.
    pub(crate) fn remove_first(&mut self, member: UnitId) -> bool {
        match self.members.iter().position(|id| *id == member) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    /// Per-member share of `amount`, floored. `None` for an empty group.
    pub fn damage_share(&self, amount: i64) -> Option<i64> {
        if self.members.is_empty() {
            return None;
        }
        Some(amount.div_euclid(self.members.len() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_share_floors() {
        let mut group = Group::new();
        assert_eq!(group.damage_share(10), None);
        group.push(UnitId(1));
        group.push(UnitId(2));
        group.push(UnitId(3));
        assert_eq!(group.damage_share(10), Some(3));
        assert_eq!(group.damage_share(2), Some(0));
        assert_eq!(group.damage_share(-1), Some(-1));
    }

    #[test]
    fn remove_first_keeps_later_duplicates() {
        let mut group = Group::new();
        group.push(UnitId(7));
        group.push(UnitId(8));
        group.push(UnitId(7));
        assert!(group.remove_first(UnitId(7)));
        assert_eq!(group.members(), &[UnitId(8), UnitId(7)]);
        assert!(!group.remove_first(UnitId(9)));
    }
}
