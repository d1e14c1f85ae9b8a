use rand::seq::SliceRandom;
use rand::Rng;

/// Returns the items in a uniformly random order.
pub fn shuffled<T, R: Rng>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items
}

/// Builds a sequence of `n` items from an index function.
pub fn generate<T, F: FnMut(usize) -> T>(n: usize, mut f: F) -> Vec<T> {
    (0..n).map(|i| f(i)).collect()
}
