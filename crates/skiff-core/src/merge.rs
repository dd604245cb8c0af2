//! Deep merge of configuration layers
//!
//! Layers are merged as JSON values so one routine serves pipeline
//! documents, profiles, sidecar files, and global context settings.
//!
//! - Objects merge key by key, recursively.
//! - Scalars from the overlay replace the base.
//! - `null` in the overlay never erases anything.
//! - Sequences are either replaced or appended, per [`SliceMerge`].
//! - When the overlay sets one key of an exclusive group, the base loses the
//!   other members of that group at the same level.

use crate::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// How sequences combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceMerge {
    /// The overlay sequence replaces the base one.
    Replace,
    /// Base entries first, then the overlay's.
    Append,
}

#[derive(Debug, Clone, Copy)]
pub struct MergeOptions<'a> {
    pub slices: SliceMerge,
    pub exclusive: &'a [Vec<&'static str>],
}

impl MergeOptions<'static> {
    pub const REPLACE: Self = Self {
        slices: SliceMerge::Replace,
        exclusive: &[],
    };

    pub const APPEND: Self = Self {
        slices: SliceMerge::Append,
        exclusive: &[],
    };
}

impl<'a> MergeOptions<'a> {
    pub fn with_exclusive(self, exclusive: &'a [Vec<&'static str>]) -> Self {
        Self { exclusive, ..self }
    }
}

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: &Value, options: &MergeOptions<'_>) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for group in options.exclusive {
                let chosen = group
                    .iter()
                    .find(|key| overlay_map.get(**key).is_some_and(|v| !v.is_null()));
                if let Some(chosen) = chosen {
                    for sibling in group.iter().filter(|key| *key != chosen) {
                        base_map.remove(*sibling);
                    }
                }
            }

            for (key, overlay_val) in overlay_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge(base_val, overlay_val, options);
                } else if !overlay_val.is_null() {
                    base_map.insert(key.clone(), overlay_val.clone());
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items))
            if options.slices == SliceMerge::Append =>
        {
            base_items.extend(overlay_items.iter().cloned());
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

/// Merge a serializable overlay onto a copy of `base` and decode the result.
pub fn merge_typed<T, O>(base: &T, overlay: &O, options: &MergeOptions<'_>) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    O: Serialize + ?Sized,
{
    let mut merged = serde_json::to_value(base)?;
    deep_merge(&mut merged, &serde_json::to_value(overlay)?, options);
    Ok(serde_json::from_value(merged)?)
}
