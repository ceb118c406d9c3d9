//! Prunes a JSON document down to its READ-visible attributes.
//!
//! A READ grant on a path exposes its whole subtree, except where a more
//! specific descendant carries an entry without READ. Paths with no entry
//! at all are only visible through a READ ancestor.
//!
//! The caller's document is never modified; a pruned deep copy is returned.
//!
//! # Example
//!
//! ```rust
//! use fieldguard_acl::filter_document;
//! use fieldguard_core::{Permission, PermissionMap, PermissionSet};
//! use serde_json::json;
//!
//! let doc = json!({"name": "John", "address": {"city": "London"}});
//! let mut perms = PermissionMap::new();
//! perms.insert("".parse().unwrap(), Permission::Read.into());
//! perms.insert("/address/city".parse().unwrap(), PermissionSet::from(Permission::Create));
//!
//! let filtered = filter_document(&doc, &perms).unwrap();
//! assert_eq!(filtered, json!({"name": "John", "address": {}}));
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use fieldguard_core::{AttributePath, PermissionMap};
use serde_json::Value;

/// Child names to keep, per parent node.
type RetainPlan = BTreeMap<AttributePath, BTreeSet<String>>;

/// Returns the READ-visible part of `document`, or `None` if nothing in
/// `permissions` grants READ.
pub fn filter_document(document: &Value, permissions: &PermissionMap) -> Option<Value> {
    let read_paths: Vec<&AttributePath> = permissions
        .iter()
        .filter(|(_, perms)| perms.can_read())
        .map(|(path, _)| path)
        .collect();
    if read_paths.is_empty() {
        return None;
    }

    let mut copy = document.clone();

    if !read_paths.iter().any(|path| path.is_root()) {
        let minimal = minimal_paths(&read_paths);
        retain_read_paths(&mut copy, &minimal);
    }

    for (denied, _) in permissions.iter().filter(|(_, perms)| !perms.can_read()) {
        let descendants: Vec<&AttributePath> = read_paths
            .iter()
            .copied()
            .filter(|path| denied.is_ancestor_of(path))
            .collect();

        if descendants.is_empty() {
            remove_node(&mut copy, denied);
        } else {
            narrow_to_descendants(&mut copy, denied, &minimal_paths(&descendants));
        }
    }

    Some(copy)
}

/// Drops every path already covered by a kept ancestor.
///
/// Input order does not matter; the result is sorted.
fn minimal_paths<'a>(paths: &[&'a AttributePath]) -> Vec<&'a AttributePath> {
    let mut sorted = paths.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut kept: Vec<&AttributePath> = Vec::new();
    for path in sorted {
        if !kept.iter().any(|ancestor| ancestor.is_ancestor_of(path)) {
            kept.push(path);
        }
    }
    kept
}

/// Adds every (parent, child) step between `top` and `target` to `plan`.
fn plan_chain(plan: &mut RetainPlan, top: &AttributePath, target: &AttributePath) {
    let mut node = target.clone();
    while let Some(parent) = node.parent() {
        if !(top == &parent || top.is_ancestor_of(&parent)) {
            break;
        }
        if let Some(segment) = node.last_segment() {
            plan.entry(parent.clone())
                .or_default()
                .insert(segment.to_string());
        }
        node = parent;
    }
}

/// Orders plan entries deepest parent first.
fn by_depth(plan: RetainPlan) -> BTreeMap<Reverse<usize>, Vec<(AttributePath, BTreeSet<String>)>> {
    let mut buckets: BTreeMap<Reverse<usize>, Vec<_>> = BTreeMap::new();
    for (parent, children) in plan {
        buckets
            .entry(Reverse(parent.depth()))
            .or_default()
            .push((parent, children));
    }
    buckets
}

/// Root not readable: keep only the branches leading to a READ path.
///
/// A parent left empty by the pruning is itself removed from its own parent.
fn retain_read_paths(document: &mut Value, minimal: &[&AttributePath]) {
    let root = AttributePath::root();
    let mut plan = RetainPlan::new();
    for path in minimal {
        plan_chain(&mut plan, &root, path);
    }

    for (_, bucket) in by_depth(plan) {
        for (parent, children) in bucket {
            let emptied = document
                .pointer_mut(parent.as_str())
                .is_some_and(|node| retain_children(node, &children));
            if emptied && !parent.is_root() {
                remove_node(document, &parent);
            }
        }
    }
}

/// A denied node with READ descendants keeps only the branches leading to them.
///
/// `descendants` must not contain a path and its own ancestor; the deeper one
/// would narrow the shallower one's subtree.
fn narrow_to_descendants(
    document: &mut Value,
    denied: &AttributePath,
    descendants: &[&AttributePath],
) {
    let mut plan = RetainPlan::new();
    for descendant in descendants {
        plan_chain(&mut plan, denied, descendant);
    }

    for (_, bucket) in by_depth(plan) {
        for (parent, children) in bucket {
            if let Some(node) = document.pointer_mut(parent.as_str()) {
                retain_children(node, &children);
            }
        }
    }
}

/// Keeps only the named children of `node`; dropped array elements become `null`.
///
/// Returns `true` when none of the named children is left.
fn retain_children(node: &mut Value, keep: &BTreeSet<String>) -> bool {
    match node {
        Value::Object(object) => {
            object.retain(|key, _| keep.contains(key));
            object.is_empty()
        }
        Value::Array(items) => {
            let mut kept = false;
            for (index, item) in items.iter_mut().enumerate() {
                if keep.contains(&index.to_string()) {
                    kept = true;
                } else {
                    *item = Value::Null;
                }
            }
            !kept
        }
        _ => false,
    }
}

/// Removes `path` from its parent: object members are deleted, array
/// elements are nulled.
fn remove_node(document: &mut Value, path: &AttributePath) {
    let (Some(parent), Some(field)) = (path.parent(), path.last_segment()) else {
        return;
    };
    match document.pointer_mut(parent.as_str()) {
        Some(Value::Object(object)) => {
            object.remove(field);
        }
        Some(Value::Array(items)) => {
            if let Some(item) = array_index(field).and_then(|i| items.get_mut(i)) {
                *item = Value::Null;
            }
        }
        _ => {}
    }
}

/// Array index for a pointer segment, using the same rules as
/// `Value::pointer`: digits only, no leading zero.
fn array_index(segment: &str) -> Option<usize> {
    if segment.starts_with('+') || (segment.len() > 1 && segment.starts_with('0')) {
        return None;
    }
    segment.parse().ok()
}

// ============================================================================
// Tests
// ============================================================================
