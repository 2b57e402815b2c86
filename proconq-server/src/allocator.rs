//! Uniform-random 4-digit session id allocation.

use std::collections::HashSet;
use std::fmt;

use rand::seq::IteratorRandom;

const MIN_ID: u16 = 1000;
const MAX_ID: u16 = 9999;

/// The allocator ran out of ids — all 9000 of the 4-digit range are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationError;

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no available session id in {MIN_ID}..={MAX_ID}")
    }
}

impl std::error::Error for AllocationError {}

/// Tracks which 4-digit ids are currently assigned.
#[derive(Default)]
pub struct IdAllocator {
    live: HashSet<u16>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a uniformly random unused id and mark it live.
    pub fn allocate(&mut self) -> Result<u16, AllocationError> {
        let mut rng = rand::thread_rng();
        let id = (MIN_ID..=MAX_ID)
            .filter(|id| !self.live.contains(id))
            .choose(&mut rng)
            .ok_or(AllocationError)?;
        self.live.insert(id);
        Ok(id)
    }

    /// Release a previously allocated id. Releasing an id not currently live is a no-op.
    pub fn release(&mut self, id: u16) {
        self.live.remove(&id);
    }

    pub fn is_live(&self, id: u16) -> bool {
        self.live.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ids_are_in_range_and_unique() {
        let mut a = IdAllocator::new();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let id = a.allocate().unwrap();
            assert!((MIN_ID..=MAX_ID).contains(&id));
            assert!(seen.insert(id), "id {id} allocated twice");
        }
    }

    #[test]
    fn exhaustion_yields_allocation_error() {
        let mut a = IdAllocator::new();
        for id in MIN_ID..=MAX_ID {
            a.live.insert(id);
        }
        assert_eq!(a.allocate(), Err(AllocationError));
    }

    #[test]
    fn release_then_allocate_can_reuse_id() {
        let mut a = IdAllocator::new();
        for id in MIN_ID..=MAX_ID {
            a.live.insert(id);
        }
        a.release(5000);
        assert_eq!(a.allocate(), Ok(5000));
    }
}
