use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type HashMap<K, V> = FxHashMap<K, V>;

/// Stable handle of a neuron within a world. Ids are never reused, so a
/// handle to a culled neuron simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NeuronId(pub u64);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
