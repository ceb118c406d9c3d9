//! Property-based tests for document filtering.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use crate::filter_document;
    use fieldguard_core::{AttributePath, Permission, PermissionMap, PermissionSet};
    use proptest::prelude::*;
    use serde_json::{json, Value};

    const PATHS: &[&str] = &[
        "", "/a", "/a/b", "/a/b/c", "/a/b/d", "/a/e", "/f", "/f/g", "/h", "/x", "/a/x",
    ];

    fn document() -> Value {
        json!({
            "a": {"b": {"c": 1, "d": 2}, "e": 3},
            "f": {"g": 4},
            "h": 5
        })
    }

    fn attribute_path() -> impl Strategy<Value = AttributePath> {
        prop::sample::select(PATHS).prop_map(|p| p.parse().unwrap())
    }

    fn permission_set() -> impl Strategy<Value = PermissionSet> {
        prop_oneof![
            Just(PermissionSet::from(Permission::Read)),
            Just(PermissionSet::all()),
            Just(PermissionSet::from(Permission::Create)),
            Just(PermissionSet::from_iter([Permission::Update, Permission::Delete])),
            Just(PermissionSet::empty()),
        ]
    }

    fn permission_map() -> impl Strategy<Value = PermissionMap> {
        prop::collection::btree_map(attribute_path(), permission_set(), 0..6)
    }

    fn read_only_map() -> impl Strategy<Value = PermissionMap> {
        prop::collection::btree_map(attribute_path(), Just(PermissionSet::from(Permission::Read)), 1..5)
    }

    /// Every JSON pointer present in `value`.
    fn pointers(value: &Value) -> BTreeSet<String> {
        fn walk(value: &Value, prefix: &str, out: &mut BTreeSet<String>) {
            out.insert(prefix.to_string());
            if let Value::Object(map) = value {
                for (key, child) in map {
                    walk(child, &format!("{prefix}/{key}"), out);
                }
            }
        }
        let mut out = BTreeSet::new();
        walk(value, "", &mut out);
        out
    }

    fn visible(document: &Value, permissions: &PermissionMap) -> BTreeSet<String> {
        filter_document(document, permissions)
            .map(|v| pointers(&v))
            .unwrap_or_default()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2048))]

        #[test]
        fn test_filtering_is_idempotent(map in permission_map()) {
            let once = filter_document(&document(), &map);
            let twice = once.as_ref().and_then(|doc| filter_document(doc, &map));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_adding_read_never_hides(map in permission_map(), extra in attribute_path()) {
            let before = visible(&document(), &map);

            let mut widened = map.clone();
            widened.entry(extra).or_default().insert(Permission::Read);
            let after = visible(&document(), &widened);

            prop_assert!(
                before.is_subset(&after),
                "lost {:?}",
                before.difference(&after).collect::<Vec<_>>()
            );
        }

        #[test]
        fn test_read_subtree_is_complete(map in read_only_map()) {
            let doc = document();
            let filtered = filter_document(&doc, &map).unwrap();
            for path in map.keys() {
                if let Some(original) = doc.pointer(path.as_str()) {
                    prop_assert_eq!(filtered.pointer(path.as_str()), Some(original));
                }
            }
        }

        #[test]
        fn test_filtered_is_subset_of_source(map in permission_map()) {
            let doc = document();
            prop_assert!(visible(&doc, &map).is_subset(&pointers(&doc)));
        }
    }
}
