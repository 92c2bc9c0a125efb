//! Crawler school membership registry.

use std::collections::{BTreeMap, BTreeSet};

use grotto_core::{EntityId, SchoolId, SchoolSnapshot};

/// Bookkeeping of which crawler belongs to which school.
///
/// The registry only tracks membership; the hit-point redistribution that
/// accompanies a merge is the world's business. Schools with no members are
/// dropped.
#[derive(Clone, Debug, Default)]
pub(crate) struct SchoolRegistry {
    schools: BTreeMap<SchoolId, BTreeSet<EntityId>>,
    next_school_id: u32,
}

impl SchoolRegistry {
    /// Allocates a fresh empty school.
    pub(crate) fn create(&mut self) -> SchoolId {
        let id = SchoolId::new(self.next_school_id);
        self.next_school_id = self.next_school_id.wrapping_add(1);
        let _ = self.schools.insert(id, BTreeSet::new());
        id
    }

    /// Whether the school currently exists.
    pub(crate) fn contains(&self, school: SchoolId) -> bool {
        self.schools.contains_key(&school)
    }

    /// Adds `entity` to `school`.
    pub(crate) fn join(&mut self, school: SchoolId, entity: EntityId) {
        if let Some(members) = self.schools.get_mut(&school) {
            let _ = members.insert(entity);
        }
    }

    /// Removes `entity` from `school`, dropping the school when it empties.
    pub(crate) fn leave(&mut self, school: SchoolId, entity: EntityId) {
        let Some(members) = self.schools.get_mut(&school) else {
            return;
        };
        let _ = members.remove(&entity);
        if members.is_empty() {
            let _ = self.schools.remove(&school);
        }
    }

    /// Number of members in `school`; zero when it does not exist.
    pub(crate) fn size(&self, school: SchoolId) -> usize {
        self.schools.get(&school).map_or(0, BTreeSet::len)
    }

    /// Members of `school` other than `except`, in id order.
    pub(crate) fn mates(&self, school: SchoolId, except: EntityId, out: &mut Vec<EntityId>) {
        out.clear();
        if let Some(members) = self.schools.get(&school) {
            out.extend(members.iter().copied().filter(|&member| member != except));
        }
    }

    /// Clears every school.
    pub(crate) fn reset(&mut self) {
        self.schools.clear();
        self.next_school_id = 0;
    }

    /// Fills `out` with a snapshot of every school, in id order.
    pub(crate) fn snapshot(&self, out: &mut Vec<SchoolSnapshot>) {
        out.clear();
        for (&id, members) in &self.schools {
            out.push(SchoolSnapshot {
                id,
                members: members.iter().copied().collect(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SchoolRegistry;
    use grotto_core::EntityId;

    #[test]
    fn membership_round_trips() {
        let mut registry = SchoolRegistry::default();
        let school = registry.create();
        let other = registry.create();
        assert_ne!(school, other);

        registry.join(school, EntityId::new(1));
        registry.join(school, EntityId::new(2));
        assert_eq!(registry.size(school), 2);

        let mut mates = Vec::new();
        registry.mates(school, EntityId::new(1), &mut mates);
        assert_eq!(mates, vec![EntityId::new(2)]);
    }

    #[test]
    fn empty_schools_are_dropped() {
        let mut registry = SchoolRegistry::default();
        let school = registry.create();
        registry.join(school, EntityId::new(5));
        assert!(registry.contains(school));

        registry.leave(school, EntityId::new(5));
        assert!(!registry.contains(school));
        assert_eq!(registry.size(school), 0);
    }

    #[test]
    fn snapshots_list_members_in_id_order() {
        let mut registry = SchoolRegistry::default();
        let school = registry.create();
        registry.join(school, EntityId::new(9));
        registry.join(school, EntityId::new(3));

        let mut snapshots = Vec::new();
        registry.snapshot(&mut snapshots);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(
            snapshots[0].members,
            vec![EntityId::new(3), EntityId::new(9)]
        );
    }
}
