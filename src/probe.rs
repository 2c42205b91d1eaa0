//! Perturbation probing over a power-of-two index table.

/// Number of bits the perturbation is shifted by on each step.
const PERTURB_SHIFT: u32 = 5;

/// An infinite, deterministic sequence of candidate slots for a hash.
///
/// The sequence depends only on the hash and the table size. The first
/// candidate is the low bits of the hash; every following candidate mixes in
/// progressively higher bits of the hash until they are exhausted, after
/// which the walk degenerates into `i = 5 * i + 1 (mod capacity)`. That
/// recurrence has full period for any power-of-two modulus, so every slot is
/// eventually visited.
///
/// The caller decides when to stop (at an empty slot or a match).
///
/// ```rust
/// # use compact_hash::probe::ProbeSeq;
/// let first: Vec<usize> = ProbeSeq::new(12345, 16 - 1).take(4).collect();
/// let again: Vec<usize> = ProbeSeq::new(12345, 16 - 1).take(4).collect();
/// assert_eq!(first, again);
/// assert!(first.iter().all(|&slot| slot < 16));
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    slot: usize,
    perturb: usize,
    mask: usize,
    started: bool,
}

impl ProbeSeq {
    /// Starts a probe sequence for `hash` over a table of `mask + 1` slots.
    ///
    /// The hash is interpreted as a signed 32-bit value and its magnitude
    /// seeds the walk, so `h` and `-h` share a sequence.
    #[inline]
    pub fn new(hash: u32, mask: usize) -> Self {
        debug_assert!(mask.wrapping_add(1).is_power_of_two());

        let magnitude = (hash as i32).unsigned_abs() as usize;
        Self {
            slot: magnitude & mask,
            perturb: magnitude,
            mask,
            started: false,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if !self.started {
            self.started = true;
            return Some(self.slot);
        }

        self.slot = self
            .slot
            .wrapping_mul(5)
            .wrapping_add(self.perturb)
            .wrapping_add(1)
            & self.mask;
        self.perturb >>= PERTURB_SHIFT;
        Some(self.slot)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
