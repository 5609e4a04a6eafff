//! Alive/grave resource bookkeeping.

use std::collections::BTreeSet;

use rand::seq::index;
use rand::Rng;

use crate::domain::records::{Participant, ResourceId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Draw `count` distinct resources uniformly from `pool`.
pub fn deal_inventory<R: Rng + ?Sized>(
    pool: &[ResourceId],
    count: usize,
    rng: &mut R,
) -> Result<BTreeSet<ResourceId>, DomainError> {
    if count > pool.len() {
        return Err(DomainError::validation(
            ValidationKind::ResourcePoolTooSmall,
            format!(
                "Cannot deal {count} resources from a pool of {}",
                pool.len()
            ),
        ));
    }
    Ok(index::sample(rng, pool.len(), count)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect())
}

impl Participant {
    /// Move `resource` from alive to grave. Callers check the resource is
    /// held first; see `check_played_resource`.
    pub fn bury(&mut self, resource: &ResourceId) {
        self.alive_resources.remove(resource);
        self.grave_resources.insert(resource.clone());
    }

    /// Add `resource` to alive; a buried copy is brought back rather than
    /// duplicated across both sets.
    pub fn gain(&mut self, resource: &ResourceId) {
        self.grave_resources.remove(resource);
        self.alive_resources.insert(resource.clone());
    }

    pub fn inventory_is_disjoint(&self) -> bool {
        self.alive_resources.is_disjoint(&self.grave_resources)
    }
}
