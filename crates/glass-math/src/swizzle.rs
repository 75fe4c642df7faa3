//! Swizzle name tables.
//!
//! A vector of length `n` can be addressed through three synonymous component alphabets
//! (`xyzw`, `rgba` and `stpq`), each truncated to `n` letters. Any string of 1 to 4 letters taken
//! from a single alphabet can be *read* (`v.xxy`, `v.bgra`). Only strings that name every
//! component at most once can be *written* (`v.zx = ...` is fine, `v.xx = ...` is not).

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tinyvec::ArrayVec;

/// The component-name alphabets, in the order they're listed in docs and error messages.
pub const ALPHABETS: [&str; 3] = ["xyzw", "rgba", "stpq"];

/// Longest swizzle that can be read.
pub const MAX_SWIZZLE_LEN: usize = 4;

/// An ordered list of component indices named by a swizzle string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swizzle(ArrayVec<[u8; MAX_SWIZZLE_LEN]>);

impl Swizzle {
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the addressed component indices, in the order they were named.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|&i| usize::from(i))
    }
}

/// Precomputed getter and setter names of one vector size.
pub struct SwizzleTable {
    size: usize,
    getters: HashMap<String, Swizzle>,
    setters: HashSet<String>,
}

impl SwizzleTable {
    /// Generates the swizzle table for vectors with `size` components.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not in `1..=4`.
    pub fn new(size: usize) -> Self {
        assert!(
            (1..=MAX_SWIZZLE_LEN).contains(&size),
            "invalid vector size {size}"
        );

        let mut getters = HashMap::new();
        let mut setters = HashSet::new();
        for alphabet in ALPHABETS {
            let alphabet = &alphabet[..size];

            for len in 1..=MAX_SWIZZLE_LEN {
                for combo in itertools::repeat_n(alphabet.char_indices(), len)
                    .multi_cartesian_product()
                {
                    let name = combo.iter().map(|&(_, c)| c).collect::<String>();
                    let indices = combo.iter().map(|&(i, _)| i as u8).collect();
                    getters.insert(name, Swizzle(indices));
                }
            }

            for len in 1..=size {
                for perm in alphabet.chars().permutations(len) {
                    setters.insert(perm.into_iter().collect::<String>());
                }
            }
        }

        log::trace!(
            "generated swizzle table for size {size}: {} getters, {} setters",
            getters.len(),
            setters.len()
        );

        Self {
            size,
            getters,
            setters,
        }
    }

    /// The vector size this table was generated for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Looks up a readable swizzle.
    pub fn getter(&self, name: &str) -> Option<&Swizzle> {
        self.getters.get(name)
    }

    /// Looks up a writable swizzle.
    ///
    /// Returns [`None`] both for names that don't exist and for names that repeat a component; use
    /// [`SwizzleTable::getter`] to tell those apart.
    pub fn setter(&self, name: &str) -> Option<&Swizzle> {
        if self.setters.contains(name) {
            self.getters.get(name)
        } else {
            None
        }
    }

    pub fn getter_count(&self) -> usize {
        self.getters.len()
    }

    pub fn setter_count(&self) -> usize {
        self.setters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(s: &Swizzle) -> Vec<usize> {
        s.indices().collect()
    }

    #[test]
    fn table_sizes() {
        // 3 alphabets * (4 + 16 + 64 + 256) / 3 * (4 + 12 + 24 + 24)
        let t4 = SwizzleTable::new(4);
        assert_eq!(t4.getter_count(), 1020);
        assert_eq!(t4.setter_count(), 192);

        let t2 = SwizzleTable::new(2);
        assert_eq!(t2.getter_count(), 90);
        assert_eq!(t2.setter_count(), 12);
    }

    #[test]
    fn getters() {
        let t = SwizzleTable::new(3);
        assert_eq!(indices(t.getter("zyx").unwrap()), [2, 1, 0]);
        assert_eq!(indices(t.getter("bgr").unwrap()), [2, 1, 0]);
        assert_eq!(indices(t.getter("ssst").unwrap()), [0, 0, 0, 1]);
        assert_eq!(indices(t.getter("y").unwrap()), [1]);
        assert!(t.getter("w").is_none());
        assert!(t.getter("xyzxy").is_none());
        // Alphabets can't be mixed.
        assert!(t.getter("xg").is_none());
    }

    #[test]
    fn setters() {
        let t = SwizzleTable::new(4);
        assert_eq!(indices(t.setter("wx").unwrap()), [3, 0]);
        assert_eq!(indices(t.setter("argb").unwrap()), [3, 0, 1, 2]);
        assert!(t.setter("xx").is_none());
        assert!(t.getter("xx").is_some());
        assert!(t.setter("nope").is_none());
    }
}
