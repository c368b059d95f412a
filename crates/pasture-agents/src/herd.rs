//! Generation-checked arena of grazers.
//!
//! Grazers are addressed by [`GrazerId`] handles. A dead grazer stays in its
//! slot as a tombstone until [`Herd::commit`] reclaims it, which advances the
//! slot generation so stale handles stop resolving. Births requested during
//! a tick are queued and only spawned at commit time, so the population
//! never changes while grazers are being iterated.

use pasture_types::{GrazerId, GrazerState, Vec2};
use tracing::{debug, info};

use crate::config::GrazerConfig;
use crate::grazer::Grazer;

/// What a [`Herd::commit`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HerdCommit {
    /// Handles of newborn grazers.
    pub born: Vec<GrazerId>,
    /// Tombstones reclaimed.
    pub reclaimed: usize,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    grazer: Option<Grazer>,
    checked_out: bool,
}

impl Slot {
    const fn is_free(&self) -> bool {
        self.grazer.is_none() && !self.checked_out
    }
}

/// All grazers in the world.
#[derive(Debug, Clone, Default)]
pub struct Herd {
    slots: Vec<Slot>,
    births: Vec<Vec2>,
}

impl Herd {
    /// An empty herd.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            births: Vec::new(),
        }
    }

    // -------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------

    /// Add a grazer at `position` immediately, reusing a free slot if one
    /// exists.
    pub fn spawn(&mut self, position: Vec2, config: &GrazerConfig) -> GrazerId {
        let grazer = Grazer::new(position, config);
        if let Some((index, slot)) = self.slots.iter_mut().enumerate().find(|(_, s)| s.is_free()) {
            slot.grazer = Some(grazer);
            return GrazerId::new(slot_index(index), slot.generation);
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            grazer: Some(grazer),
            checked_out: false,
        });
        GrazerId::new(slot_index(index), 0)
    }

    /// Queue a birth at `position` for the next commit.
    pub fn queue_birth(&mut self, position: Vec2) {
        self.births.push(position);
    }

    /// Number of births waiting for the next commit.
    pub fn pending_births(&self) -> usize {
        self.births.len()
    }

    /// Reclaim tombstones, then spawn queued births.
    pub fn commit(&mut self, config: &GrazerConfig) -> HerdCommit {
        let mut commit = HerdCommit::default();
        for slot in &mut self.slots {
            if slot.grazer.as_ref().is_some_and(|g| !g.is_alive) {
                slot.grazer = None;
                slot.generation = slot.generation.wrapping_add(1);
                commit.reclaimed = commit.reclaimed.saturating_add(1);
            }
        }
        let births = std::mem::take(&mut self.births);
        for position in births {
            let id = self.spawn(position, config);
            info!(grazer = %id, x = position.x, y = position.y, "Grazer born");
            commit.born.push(id);
        }
        commit
    }

    /// Resolve a handle. Stale handles and checked-out grazers give `None`.
    pub fn get(&self, id: GrazerId) -> Option<&Grazer> {
        self.slot(id).and_then(|s| s.grazer.as_ref())
    }

    /// Resolve a handle mutably.
    pub fn get_mut(&mut self, id: GrazerId) -> Option<&mut Grazer> {
        self.slot_mut(id).and_then(|s| s.grazer.as_mut())
    }

    /// Whether `id` resolves to a living grazer.
    pub fn is_alive(&self, id: GrazerId) -> bool {
        self.get(id).is_some_and(|g| g.is_alive)
    }

    /// Handles of every grazer present, tombstones included, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = GrazerId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.grazer
                .as_ref()
                .map(|_| GrazerId::new(slot_index(index), slot.generation))
        })
    }

    /// Every grazer present, with its handle, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GrazerId, &Grazer)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.grazer
                .as_ref()
                .map(|g| (GrazerId::new(slot_index(index), slot.generation), g))
        })
    }

    /// Number of living grazers.
    pub fn alive_count(&self) -> usize {
        self.iter().filter(|(_, g)| g.is_alive).count()
    }

    /// Check a grazer out for an exclusive update. Its slot stays reserved
    /// until [`Herd::restore`].
    pub fn take(&mut self, id: GrazerId) -> Option<Grazer> {
        let slot = self.slot_mut(id)?;
        let grazer = slot.grazer.take()?;
        slot.checked_out = true;
        Some(grazer)
    }

    /// Return a grazer checked out with [`Herd::take`].
    pub fn restore(&mut self, id: GrazerId, grazer: Grazer) {
        if let Some(slot) = self.slot_mut(id) {
            slot.grazer = Some(grazer);
            slot.checked_out = false;
        }
    }

    // -------------------------------------------------------------------
    // Mating
    // -------------------------------------------------------------------

    /// First grazer in slot order that `caller` could mate with.
    pub fn find_mate(&self, caller: GrazerId) -> Option<GrazerId> {
        self.ids()
            .find(|&candidate| candidate != caller && self.can_mate(candidate, caller))
    }

    /// Whether `candidate` is alive, Reproducing, and either unpaired or
    /// already paired with `claimer`.
    pub fn can_mate(&self, candidate: GrazerId, claimer: GrazerId) -> bool {
        self.get(candidate).is_some_and(|g| {
            g.is_alive
                && g.state == GrazerState::Reproducing
                && g.mate.is_none_or(|m| m == claimer)
                && (!g.is_mated_with || g.mate == Some(claimer))
        })
    }

    /// Pair `mate` with `claimer`. Returns whether the claim took.
    pub fn claim_mate(&mut self, mate: GrazerId, claimer: GrazerId) -> bool {
        if mate == claimer || !self.can_mate(mate, claimer) {
            return false;
        }
        let Some(partner) = self.get_mut(mate) else {
            return false;
        };
        partner.accept_claim(claimer);
        debug!(grazer = %claimer, mate = %mate, "Grazer claimed a mate");
        true
    }

    /// Undo a pairing from `releaser`'s side. Only resets `mate` if it is
    /// still paired with `releaser`. `keep_reproduce` is set when the
    /// releaser died.
    pub fn release_mate(
        &mut self,
        mate: GrazerId,
        releaser: GrazerId,
        config: &GrazerConfig,
        keep_reproduce: bool,
    ) {
        if let Some(partner) = self.get_mut(mate).filter(|g| g.mate == Some(releaser)) {
            partner.reset_mate(config, keep_reproduce);
        }
    }

    // -------------------------------------------------------------------
    // Prey
    // -------------------------------------------------------------------

    /// First living grazer in slot order within `radius` of `from`.
    ///
    /// Grazers scanned before the match have their hunted flag cleared and
    /// their calm sprite restored.
    pub fn nearest_huntable(&mut self, from: Vec2, radius: f32) -> Option<GrazerId> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(grazer) = slot.grazer.as_mut() else {
                continue;
            };
            if grazer.is_alive
                && grazer.health > 0.0
                && grazer.body.distance_to(from) <= radius
            {
                return Some(GrazerId::new(slot_index(index), slot.generation));
            }
            grazer.calm_down();
        }
        None
    }

    /// Flag `id` as hunted.
    pub fn mark_hunted(&mut self, id: GrazerId) {
        if let Some(grazer) = self.get_mut(id).filter(|g| g.is_alive) {
            grazer.is_being_hunted = true;
        }
    }

    /// Clear the hunted flag on `id` and restore its calm sprite.
    pub fn clear_hunted(&mut self, id: GrazerId) {
        if let Some(grazer) = self.get_mut(id) {
            grazer.calm_down();
        }
    }

    /// Bite `id` for `damage` and clear its hunted flag without touching
    /// its state. Returns whether the bite landed.
    pub fn bite(&mut self, id: GrazerId, damage: f32) -> bool {
        let Some(grazer) = self.get_mut(id).filter(|g| g.is_alive) else {
            return false;
        };
        grazer.take_damage(damage);
        grazer.is_being_hunted = false;
        true
    }

    // -------------------------------------------------------------------
    // Slots
    // -------------------------------------------------------------------

    fn slot(&self, id: GrazerId) -> Option<&Slot> {
        usize::try_from(id.index())
            .ok()
            .and_then(|i| self.slots.get(i))
            .filter(|s| s.generation == id.generation())
    }

    fn slot_mut(&mut self, id: GrazerId) -> Option<&mut Slot> {
        usize::try_from(id.index())
            .ok()
            .and_then(|i| self.slots.get_mut(i))
            .filter(|s| s.generation == id.generation())
    }
}

fn slot_index(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use pasture_types::Sprite;

    use super::*;

    fn herd_of(n: usize) -> (Herd, Vec<GrazerId>, GrazerConfig) {
        let config = GrazerConfig::default();
        let mut herd = Herd::new();
        let ids = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = 100.0 * i as f32;
                herd.spawn(Vec2::new(x, 0.0), &config)
            })
            .collect();
        (herd, ids, config)
    }

    #[test]
    fn reclaimed_slot_invalidates_old_handle() {
        let (mut herd, ids, config) = herd_of(2);
        let dead = ids[0];
        herd.get_mut(dead).unwrap().is_alive = false;
        assert!(herd.get(dead).is_some());

        let commit = herd.commit(&config);
        assert_eq!(commit.reclaimed, 1);
        assert!(herd.get(dead).is_none());

        let newcomer = herd.spawn(Vec2::ZERO, &config);
        assert_eq!(newcomer.index(), dead.index());
        assert_ne!(newcomer, dead);
        assert!(herd.get(dead).is_none());
        assert!(herd.is_alive(newcomer));
    }

    #[test]
    fn births_wait_for_commit() {
        let (mut herd, _, config) = herd_of(1);
        herd.queue_birth(Vec2::new(5.0, 5.0));
        assert_eq!(herd.alive_count(), 1);
        assert_eq!(herd.pending_births(), 1);
        let commit = herd.commit(&config);
        assert_eq!(commit.born.len(), 1);
        assert_eq!(herd.alive_count(), 2);
        let baby = herd.get(commit.born[0]).unwrap();
        assert_eq!(baby.state, GrazerState::Hungry);
        assert_eq!(baby.body.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn checked_out_slot_is_not_reused() {
        let (mut herd, ids, config) = herd_of(1);
        let grazer = herd.take(ids[0]).unwrap();
        assert!(herd.get(ids[0]).is_none());
        let other = herd.spawn(Vec2::ZERO, &config);
        assert_ne!(other.index(), ids[0].index());
        herd.restore(ids[0], grazer);
        assert!(herd.is_alive(ids[0]));
    }

    #[test]
    fn find_mate_skips_caller_and_unready_grazers() {
        let (mut herd, ids, _) = herd_of(4);
        for &id in &ids[..3] {
            herd.get_mut(id).unwrap().state = GrazerState::Reproducing;
        }
        herd.get_mut(ids[1]).unwrap().is_alive = false;
        assert_eq!(herd.find_mate(ids[0]), Some(ids[2]));
        assert_eq!(herd.find_mate(ids[2]), Some(ids[0]));
        assert_eq!(herd.find_mate(ids[3]), Some(ids[0]));
    }

    #[test]
    fn claim_and_release_round_trip() {
        let (mut herd, ids, config) = herd_of(3);
        let (claimer, mate, rival) = (ids[0], ids[1], ids[2]);
        herd.get_mut(mate).unwrap().state = GrazerState::Reproducing;

        assert!(herd.claim_mate(mate, claimer));
        let partner = herd.get(mate).unwrap();
        assert!(partner.is_mated_with);
        assert_eq!(partner.mate, Some(claimer));
        assert!(herd.can_mate(mate, claimer));
        assert!(!herd.can_mate(mate, rival));
        assert!(!herd.claim_mate(mate, rival));

        herd.release_mate(mate, rival, &config, false);
        assert!(herd.get(mate).unwrap().is_mated_with);

        herd.release_mate(mate, claimer, &config, false);
        let partner = herd.get(mate).unwrap();
        assert_eq!(partner.state, GrazerState::Satiated);
        assert!(!partner.is_mated_with);
        assert_eq!(partner.mate, None);
        assert_eq!(partner.sprite, Sprite::GrazerSatiated);
    }

    #[test]
    fn release_after_death_keeps_the_reproduce_flag() {
        let (mut herd, ids, config) = herd_of(2);
        for &id in &ids {
            let grazer = herd.get_mut(id).unwrap();
            grazer.state = GrazerState::Reproducing;
            grazer.can_reproduce = true;
        }
        let (claimer, mate) = (ids[0], ids[1]);
        assert!(herd.claim_mate(mate, claimer));

        herd.release_mate(mate, claimer, &config, true);
        let partner = herd.get(mate).unwrap();
        assert_eq!(partner.state, GrazerState::Satiated);
        assert!(partner.can_reproduce);

        herd.get_mut(mate).unwrap().state = GrazerState::Reproducing;
        assert!(herd.claim_mate(mate, claimer));
        herd.release_mate(mate, claimer, &config, false);
        assert!(!herd.get(mate).unwrap().can_reproduce);
    }

    #[test]
    fn grazer_pursuing_its_own_mate_is_not_claimable() {
        let (mut herd, ids, _) = herd_of(3);
        for &id in &ids {
            herd.get_mut(id).unwrap().state = GrazerState::Reproducing;
        }
        herd.get_mut(ids[1]).unwrap().mate = Some(ids[2]);
        assert!(!herd.can_mate(ids[1], ids[0]));
        assert_eq!(herd.find_mate(ids[0]), Some(ids[2]));
    }

    #[test]
    fn huntable_scan_is_first_in_range_and_calms_earlier_grazers() {
        let (mut herd, ids, _) = herd_of(3);
        for &id in &ids {
            herd.mark_hunted(id);
            herd.get_mut(id).unwrap().show_fear();
        }
        // Grazers sit at x = 0, 100, 200.
        let found = herd.nearest_huntable(Vec2::new(150.0, 0.0), 60.0);
        assert_eq!(found, Some(ids[1]));
        let first = herd.get(ids[0]).unwrap();
        assert!(!first.is_being_hunted);
        assert_eq!(first.sprite, Sprite::GrazerNormal);
        assert!(herd.get(ids[1]).unwrap().is_being_hunted);
        assert!(herd.get(ids[2]).unwrap().is_being_hunted);

        assert_eq!(herd.nearest_huntable(Vec2::new(1000.0, 0.0), 60.0), None);
        assert!(herd.iter().all(|(_, g)| !g.is_being_hunted));
    }

    #[test]
    fn bite_damages_and_clears_hunted_without_state_change() {
        let (mut herd, ids, _) = herd_of(1);
        herd.mark_hunted(ids[0]);
        assert!(herd.bite(ids[0], 10.0));
        let grazer = herd.get(ids[0]).unwrap();
        assert!(grazer.health.abs() < f32::EPSILON);
        assert!(!grazer.is_being_hunted);
        assert_eq!(grazer.state, GrazerState::Hungry);
        assert!(grazer.is_alive);
    }
}
