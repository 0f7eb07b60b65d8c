use std::cmp::Ordering;

/// Pair that is ordered only by its first element.
/// Used to put payloads into a `BinaryHeap`.
#[derive(Debug, Clone, Copy)]
pub struct OrdPair<P: Ord, T>(pub P, pub T);

impl<P: Ord, T> PartialEq for OrdPair<P, T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<P: Ord, T> Eq for OrdPair<P, T> {}

impl<P: Ord, T> PartialOrd for OrdPair<P, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Ord, T> Ord for OrdPair<P, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn ord_pair_heap() {
        use super::*;
        use std::cmp::Reverse;
        use std::collections::BinaryHeap;

        let mut heap = BinaryHeap::new();
        heap.push(OrdPair(Reverse((2, 0)), "b"));
        heap.push(OrdPair(Reverse((1, 1)), "a2"));
        heap.push(OrdPair(Reverse((1, 0)), "a1"));
        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|OrdPair(_, v)| v)).collect();
        assert_eq!(order, ["a1", "a2", "b"]);
    }
}
