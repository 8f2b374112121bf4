use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Request-lifetime store of resolved outcomes.
///
/// The cached value is the *outcome* of a key's resolution, not a raw record:
/// `Some(record)`/`None` for one-to-one loaders, a (possibly empty) group for
/// grouped loaders. Caching the outcome rather than the record means a key
/// that resolved to nothing is remembered too, so it is fetched at most once
/// per loader instance.
pub trait OutcomeCache {
    type K;
    type Out;

    /// Returns the cached outcomes for the requested keys, in key order.
    /// `None` means the key has not been resolved yet.
    fn get(&self, keys: &[Self::K]) -> Vec<Option<&Self::Out>>;

    /// Returns key/outcome pairs for the requested keys.
    fn get_key_vals<'cache, 'a>(
        &'cache self,
        keys: &'a [Self::K],
    ) -> Vec<(&'a Self::K, Option<&'cache Self::Out>)>;

    fn insert(&mut self, key: Self::K, outcome: Self::Out);
    fn insert_many<I: IntoIterator<Item = (Self::K, Self::Out)>>(&mut self, entries: I);

    fn remove(&mut self, keys: &[Self::K]);
    fn flush(&mut self);
}

impl<K, Out, S: BuildHasher> OutcomeCache for HashMap<K, Out, S>
where
    K: Eq + Hash,
{
    type K = K;
    type Out = Out;

    fn get(&self, keys: &[Self::K]) -> Vec<Option<&Self::Out>> {
        keys.iter().map(|k| self.get(k)).collect::<Vec<_>>()
    }

    fn get_key_vals<'cache, 'a>(
        &'cache self,
        keys: &'a [Self::K],
    ) -> Vec<(&'a Self::K, Option<&'cache Self::Out>)> {
        keys.iter().map(|k| (k, self.get(k))).collect::<Vec<_>>()
    }

    fn insert(&mut self, key: Self::K, outcome: Self::Out) {
        self.insert(key, outcome);
    }

    fn insert_many<I: IntoIterator<Item = (Self::K, Self::Out)>>(&mut self, entries: I) {
        for (key, outcome) in entries.into_iter() {
            self.insert(key, outcome);
        }
    }

    fn remove(&mut self, keys: &[Self::K]) {
        for key in keys.iter() {
            self.remove(key);
        }
    }

    fn flush(&mut self) {
        self.clear();
    }
}
