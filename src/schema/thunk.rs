use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

/// Lazily evaluated schema component.
///
/// Object fields, interface lists, union members, enum values and input
/// fields may reference types that are defined later, so each of them is
/// either given directly or as a closure. The closure runs at most once, the
/// first time the component is read; concurrent readers all observe the same
/// value.
pub struct Thunk<T> {
    value: OnceLock<T>,
    init: Mutex<Option<Box<dyn FnOnce() -> T + Send>>>,
}

impl<T> Thunk<T> {
    /// Already evaluated component.
    pub fn new(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
            init: Mutex::new(None),
        }
    }

    /// Component computed by `f` on first access.
    pub fn lazy(f: impl FnOnce() -> T + Send + 'static) -> Self {
        Self {
            value: OnceLock::new(),
            init: Mutex::new(Some(Box::new(f))),
        }
    }

    /// Resolves the component.
    pub fn get(&self) -> &T {
        self.value.get_or_init(|| {
            let init = self
                .init
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            match init {
                Some(f) => f(),
                // `OnceLock` guarantees a single initializer, so a missing
                // closure means it panicked on a previous attempt.
                None => panic!("schema thunk initializer panicked earlier"),
            }
        })
    }

    /// Whether the component was already evaluated.
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T> From<T> for Thunk<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Default> Default for Thunk<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(v) => f.debug_tuple("Thunk").field(v).finish(),
            None => f.write_str("Thunk(<lazy>)"),
        }
    }
}
