//! Caller-supplied values for injected parameters.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cmdline_core::ContextKey;

/// Shared, type-erased context value.
pub type Attribute = Arc<dyn Any + Send + Sync>;

/// Mapping from type identity to an externally supplied instance.
///
/// Populated by the host before binding and consulted only for injected
/// parameters, never for options or arguments.
///
/// # Examples
///
/// ```
/// use cmdline_core::ContextKey;
/// use cmdline_matcher::InvocationContext;
///
/// #[derive(Debug, PartialEq)]
/// struct Locale(&'static str);
///
/// let context = InvocationContext::new().with(Locale("fr"));
/// assert_eq!(context.get::<Locale>(), Some(&Locale("fr")));
/// assert!(context.contains(&ContextKey::of::<Locale>()));
/// assert!(context.get::<String>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct InvocationContext {
    attributes: HashMap<ContextKey, Attribute>,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under the key of its type, replacing any previous one.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.attributes
            .insert(ContextKey::of::<T>(), Arc::new(value));
    }

    /// Builder form of [`set`](Self::set).
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.set(value);
        self
    }

    /// Stores an attribute under an explicit key.
    pub fn insert(&mut self, key: ContextKey, value: Attribute) -> Option<Attribute> {
        self.attributes.insert(key, value)
    }

    /// Returns the value stored under the key of `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.attributes
            .get(&ContextKey::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns the attribute stored under `key`, whatever its type.
    pub fn lookup(&self, key: &ContextKey) -> Option<Attribute> {
        self.attributes.get(key).cloned()
    }

    pub fn contains(&self, key: &ContextKey) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn remove(&mut self, key: &ContextKey) -> Option<Attribute> {
        self.attributes.remove(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.attributes.keys()).finish()
    }
}
