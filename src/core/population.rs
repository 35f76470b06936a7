use std::collections::HashSet;

use crate::{
    config::Tuning,
    core::{generator, random::RandomSource},
    types::{DecorativeItem, ItemId, Layer},
};

/// Append-only item list that refuses to grow past its cap.
#[derive(Debug)]
pub struct Population {
    items: Vec<DecorativeItem>,
    ids: HashSet<ItemId>,
    cap: usize,
}

impl Population {
    /// Seeds `tuning.seed_items` items with ids `0..seed_items`.
    pub fn seeded(source: &mut dyn RandomSource, tuning: &Tuning) -> Self {
        let cap = tuning.population_cap;
        let seed = tuning.seed_items.min(cap);
        let mut population = Self {
            items: Vec::with_capacity(cap),
            ids: HashSet::with_capacity(cap),
            cap,
        };
        for i in 0..seed {
            let item = generator::generate(ItemId(i as u64), source, tuning);
            population.ids.insert(item.id);
            population.items.push(item);
        }
        population
    }

    /// Appends one freshly generated item unless the cap is reached.
    /// A taken `candidate` id is bumped until free. Returns the id used.
    pub fn grow(
        &mut self,
        candidate: ItemId,
        source: &mut dyn RandomSource,
        tuning: &Tuning,
    ) -> Option<ItemId> {
        if self.is_full() {
            return None;
        }
        let mut id = candidate;
        while self.ids.contains(&id) {
            id = ItemId(id.0.wrapping_add(1));
        }
        let item = generator::generate(id, source, tuning);
        self.ids.insert(id);
        self.items.push(item);
        Some(id)
    }

    #[cfg(test)]
    pub fn items(&self) -> &[DecorativeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DecorativeItem> + '_ {
        self.items.iter().filter(move |item| item.layer == layer)
    }
}
