//! Attribute permission maps and their union.

use std::collections::BTreeMap;

use crate::path::AttributePath;
use crate::permission::PermissionSet;

/// Effective permissions keyed by attribute.
pub type PermissionMap = BTreeMap<AttributePath, PermissionSet>;

/// Unions permission maps key by key.
///
/// Each key present in any input maps to the union of its sets across all
/// inputs. The operation is commutative and associative.
pub fn merge_permissions<'a, I>(maps: I) -> PermissionMap
where
    I: IntoIterator<Item = &'a PermissionMap>,
{
    let mut merged = PermissionMap::new();
    for map in maps {
        for (path, permissions) in map {
            add_permissions(&mut merged, path.clone(), *permissions);
        }
    }
    merged
}

/// Inserts `permissions` for `path`, unioning with any existing entry.
pub fn add_permissions(map: &mut PermissionMap, path: AttributePath, permissions: PermissionSet) {
    map.entry(path)
        .and_modify(|existing| *existing = existing.union(permissions))
        .or_insert(permissions);
}
