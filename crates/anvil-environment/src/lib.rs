//! Category-keyed mutable store scoped to an [`Environment`] value.
//!
//! An `Environment` maps a category (a type token) to a mutable key/value
//! map. The map for a category is allocated on first access and the same
//! map instance is handed out on every later access with that category, so
//! mutations by one caller are visible to all others. There is no global
//! instance: construct an `Environment` where the scope begins and drop it
//! where the scope ends.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

const TARGET: &str = "anvil.environment";

/// Scoped category-keyed store.
///
/// Clones share the same underlying categories; use a clone wherever a
/// second handle to the same scope is needed.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    categories: Arc<Mutex<HashMap<TypeId, CategoryMap>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map for category `C`, allocating it on first access.
    ///
    /// Every call with the same `C` returns the same map instance for the
    /// lifetime of this environment (identity is observable through
    /// [`CategoryMap::same_map`]).
    pub fn of<C: 'static>(&self) -> CategoryMap {
        let mut categories = lock(&self.categories);
        categories
            .entry(TypeId::of::<C>())
            .or_insert_with(|| {
                tracing::debug!(target: TARGET, category = type_name::<C>(), "new category map");
                CategoryMap::new()
            })
            .clone()
    }

    /// Number of categories allocated so far.
    pub fn len(&self) -> usize {
        lock(&self.categories).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable key/value map for one category.
///
/// Clones are handles to the same map. Values are [`serde_json::Value`] so
/// heterogeneous data can be stashed without a type-erasure layer.
#[derive(Clone, Debug, Default)]
pub struct CategoryMap {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl CategoryMap {
    fn new() -> Self {
        Self::default()
    }

    /// Returns whether `self` and `other` are handles to the same map
    /// instance (not merely equal contents).
    pub fn same_map(&self, other: &CategoryMap) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        lock(&self.entries).insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        lock(&self.entries).get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        lock(&self.entries).remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        lock(&self.entries).contains_key(key)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.entries).keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UiScope;
    struct TestScope;

    #[test]
    fn same_category_returns_same_map() {
        let env = Environment::new();
        let first = env.of::<UiScope>();
        first.insert("key", json!("value"));

        let second = env.of::<UiScope>();
        assert!(first.same_map(&second));
        assert_eq!(second.get("key"), Some(json!("value")));

        second.insert("other", json!(42));
        assert_eq!(first.get("other"), Some(json!(42)));
    }

    #[test]
    fn distinct_categories_are_distinct_maps() {
        let env = Environment::new();
        let ui = env.of::<UiScope>();
        let test = env.of::<TestScope>();
        assert!(!ui.same_map(&test));

        ui.insert("key", json!(true));
        assert_eq!(test.get("key"), None);
    }

    #[test]
    fn clones_share_the_same_scope() {
        let env = Environment::new();
        let other_handle = env.clone();

        env.of::<UiScope>().insert("shared", json!("yes"));
        assert_eq!(other_handle.of::<UiScope>().get("shared"), Some(json!("yes")));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn separate_environments_are_independent() {
        let a = Environment::new();
        let b = Environment::new();

        a.of::<UiScope>().insert("key", json!(1));
        assert!(b.of::<UiScope>().is_empty());
        assert!(!a.of::<UiScope>().same_map(&b.of::<UiScope>()));
    }

    #[test]
    fn remove_and_keys() {
        let env = Environment::new();
        let map = env.of::<TestScope>();
        map.insert("b", json!(2));
        map.insert("a", json!(1));

        assert_eq!(map.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(map.remove("a"), Some(json!(1)));
        assert!(!map.contains_key("a"));
        assert_eq!(map.len(), 1);
    }
}
