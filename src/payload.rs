//! The genetic substrate carried by each node.
//!
//! The genealogy never interprets payload content.
//! Recombination only needs to read and write a
//! contiguous region, and copies need a deep clone.

/// Access to an externally defined genetic substrate.
///
/// Regions are half-open, `[lo, hi)`, in sequence
/// coordinates.
pub trait Payload: Clone {
    /// Opaque copy of a region.
    type Region;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// May panic if `hi > self.len()` or `lo > hi`.
    fn region(&self, lo: usize, hi: usize) -> Self::Region;

    /// # Panics
    ///
    /// May panic if the region does not fit `[lo, hi)`.
    fn set_region(&mut self, lo: usize, hi: usize, region: Self::Region);
}

impl<T: Clone> Payload for Vec<T> {
    type Region = Vec<T>;

    fn len(&self) -> usize {
        self.len()
    }

    fn region(&self, lo: usize, hi: usize) -> Self::Region {
        self[lo..hi].to_vec()
    }

    fn set_region(&mut self, lo: usize, hi: usize, region: Self::Region) {
        assert_eq!(hi - lo, region.len());
        self.splice(lo..hi, region);
    }
}

#[cfg(test)]
mod test_vec_payload {
    use super::Payload;

    #[test]
    fn test_region_exchange() {
        let mut a = vec![0_u8; 6];
        let mut b = vec![1_u8; 6];
        let ra = a.region(2, 6);
        let rb = b.region(2, 6);
        a.set_region(2, 6, rb);
        b.set_region(2, 6, ra);
        assert_eq!(a, [0, 0, 1, 1, 1, 1]);
        assert_eq!(b, [1, 1, 0, 0, 0, 0]);
        assert_eq!(Payload::len(&a), 6);
    }
}
