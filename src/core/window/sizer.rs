//! Item sizing for byte-bounded windows

use serde::Serialize;

/// Computes the serialized size of an item in bytes
pub trait ItemSizer<T>: Send + Sync {
    /// Fails when the item has no serialized form
    fn size_of(&self, item: &T) -> Result<usize, serde_json::Error>;
}

/// Size of the item's JSON encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSizer;

impl<T: Serialize> ItemSizer<T> for JsonSizer {
    fn size_of(&self, item: &T) -> Result<usize, serde_json::Error> {
        serde_json::to_vec(item).map(|bytes| bytes.len())
    }
}

/// Every item counts as zero bytes, so only the count bound applies
#[derive(Debug, Clone, Copy, Default)]
pub struct CountOnly;

impl<T> ItemSizer<T> for CountOnly {
    fn size_of(&self, _item: &T) -> Result<usize, serde_json::Error> {
        Ok(0)
    }
}

/// Adapter for plain closures
#[derive(Clone)]
pub struct FnSizer<F>(pub F);

impl<T, F> ItemSizer<T> for FnSizer<F>
where
    F: Fn(&T) -> usize + Send + Sync,
{
    fn size_of(&self, item: &T) -> Result<usize, serde_json::Error> {
        Ok((self.0)(item))
    }
}
