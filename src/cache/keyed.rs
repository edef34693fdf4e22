use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

use super::load::{LoadCell, LoadStatus};

/// One [`LoadCell`] per key, created on first request for that key.
///
/// Cells are handed out as `Arc`s so no map guard is held while a load is
/// awaited.
#[derive(Debug)]
pub struct KeyedCells<K, V>
where
    K: Eq + Hash,
{
    cells: DashMap<K, Arc<LoadCell<V>>>,
}

impl<K, V> Default for KeyedCells<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyedCells<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }

    pub fn cell<Q>(&self, key: &Q) -> Arc<LoadCell<V>>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(cell) = self.cells.get(key) {
            return Arc::clone(cell.value());
        }
        Arc::clone(
            self.cells
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(LoadCell::new()))
                .value(),
        )
    }

    pub fn status<Q>(&self, key: &Q) -> LoadStatus
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.cells
            .get(key)
            .map_or(LoadStatus::NotLoaded, |cell| cell.status())
    }

    /// Drop the cell for `key` unless it holds a value or a load is in flight.
    ///
    /// Called after a failed load so unknown keys do not accumulate.
    pub fn forget_unloaded<Q>(&self, key: &Q)
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.cells
            .remove_if(key, |_, cell| cell.status() == LoadStatus::NotLoaded);
    }

    /// Number of keys with a cell, loaded or not.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of keys whose value has been loaded.
    pub fn loaded_len(&self) -> usize {
        self.cells
            .iter()
            .filter(|entry| entry.value().status() == LoadStatus::Loaded)
            .count()
    }
}
