//! Base track selection.

use std::collections::BTreeSet;

use log::{debug, info};

use unfurl_core::segment::TrackRange;

use crate::{error::UnfurlError, store::TimelineStore};

/// Where new output goes, and what must be cleared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// A fixed block; existing items on `clear` are removed before writing.
    Pinned { base: u32, clear: TrackRange },
    /// The first free block above every occupied track.
    Appended { base: u32 },
}

impl Allocation {
    /// The allocated base track.
    pub fn base(&self) -> u32 {
        match self {
            Allocation::Pinned { base, .. } | Allocation::Appended { base } => *base,
        }
    }
}

/// Chooses the base track for a run.
///
/// A non-zero requested base pins output to `[base, base + 2]`, and
/// regenerating into the same block replaces what the previous run left
/// there. A requested base of `0` appends above existing output and clears
/// nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelAllocator {
    requested_base: u32,
}

impl ChannelAllocator {
    /// Creates an allocator for `requested_base`, `0` meaning auto.
    pub fn new(requested_base: u32) -> Self {
        Self { requested_base }
    }

    /// Decides the allocation without touching any store.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Layout`] if the block would run past the last
    /// representable track.
    pub fn plan(&self, existing: &BTreeSet<u32>) -> Result<Allocation, UnfurlError> {
        if self.requested_base > 0 {
            let base = self.requested_base;
            let clear = lanes_from(base)?;
            return Ok(Allocation::Pinned { base, clear });
        }

        let base = match existing.last() {
            None => 1,
            Some(&highest) => highest.checked_add(1).ok_or_else(|| {
                UnfurlError::Layout(format!("no free track above track {highest}"))
            })?,
        };
        lanes_from(base)?;
        Ok(Allocation::Appended { base })
    }

    /// Plans against `store` and, in pinned mode, clears the block.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Store`] if the store cannot be read or refuses
    /// the removal, or [`UnfurlError::Layout`] on track overflow.
    pub fn allocate<S: TimelineStore>(&self, store: &mut S) -> Result<u32, UnfurlError> {
        let existing = store.list_track_numbers()?;
        let allocation = self.plan(&existing)?;

        if let Allocation::Pinned { clear, .. } = allocation {
            let removed = store.remove_items(clear)?;
            debug!(tracks:% = clear, removed; "Cleared pinned tracks");
        }

        info!(base = allocation.base(), occupied = existing.len(); "Allocated tracks");
        Ok(allocation.base())
    }
}

fn lanes_from(base: u32) -> Result<TrackRange, UnfurlError> {
    TrackRange::lanes_from(base)
        .ok_or_else(|| UnfurlError::Layout(format!("tracks starting at {base} overflow")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoredSegment};

    fn tracks(numbers: &[u32]) -> BTreeSet<u32> {
        numbers.iter().copied().collect()
    }

    #[test]
    fn test_auto_on_empty_store_is_one() {
        let allocation = ChannelAllocator::new(0).plan(&tracks(&[])).unwrap();
        assert_eq!(allocation, Allocation::Appended { base: 1 });
    }

    #[test]
    fn test_auto_appends_above_highest() {
        let allocation = ChannelAllocator::new(0).plan(&tracks(&[2, 5, 7])).unwrap();
        assert_eq!(allocation.base(), 8);
    }

    #[test]
    fn test_pinned_clears_block() {
        let allocation = ChannelAllocator::new(3).plan(&tracks(&[2, 5, 7])).unwrap();
        assert_eq!(
            allocation,
            Allocation::Pinned {
                base: 3,
                clear: TrackRange::new(3, 5)
            }
        );
    }

    #[test]
    fn test_overflow_is_a_layout_error() {
        let err = ChannelAllocator::new(u32::MAX - 1)
            .plan(&tracks(&[]))
            .unwrap_err();
        assert!(matches!(err, UnfurlError::Layout(_)));

        let err = ChannelAllocator::new(0)
            .plan(&tracks(&[u32::MAX]))
            .unwrap_err();
        assert!(matches!(err, UnfurlError::Layout(_)));
    }

    #[test]
    fn test_allocate_pinned_removes_only_block() {
        let mut store = MemoryStore::new();
        for (track, start) in [(2, 0), (3, 10), (5, 20), (6, 30), (7, 40)] {
            store.create_segment(track, start, start + 5, "old").unwrap();
        }

        let base = ChannelAllocator::new(3).allocate(&mut store).unwrap();

        assert_eq!(base, 3);
        let remaining: Vec<_> = store.segments().iter().map(StoredSegment::track).collect();
        assert_eq!(remaining, [2, 6, 7]);
    }

    #[test]
    fn test_allocate_auto_leaves_store_untouched() {
        let mut store = MemoryStore::new();
        for (track, start) in [(2, 0), (5, 10), (7, 20)] {
            store.create_segment(track, start, start + 5, "old").unwrap();
        }
        let before = store.clone();

        let base = ChannelAllocator::new(0).allocate(&mut store).unwrap();

        assert_eq!(base, 8);
        assert_eq!(store, before);
    }
}
