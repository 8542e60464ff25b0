use core::any::{type_name, Any};
use std::sync::Arc;

/// Type-erased exported value of a module.
///
/// Every consumer of a module receives a clone of the same [`Arc`], so identity is preserved
/// across resolutions (`Arc::ptr_eq` holds).
pub type Value = Arc<dyn Any + Send + Sync>;

/// Wraps a value into a [`Value`]
#[inline]
#[must_use]
pub fn value<T: Send + Sync + 'static>(val: T) -> Value {
    Arc::new(val)
}

#[inline]
pub(crate) fn downcast<T: Send + Sync + 'static>(value: &Value) -> Result<Arc<T>, &'static str> {
    value.clone().downcast::<T>().map_err(|_| type_name::<T>())
}

#[cfg(test)]
mod tests {
    use super::{downcast, value};

    use std::sync::Arc;

    #[test]
    fn test_downcast() {
        let val = value(5_u32);

        let first = downcast::<u32>(&val).unwrap();
        let second = downcast::<u32>(&val).unwrap();
        assert_eq!(*first, 5);
        assert!(Arc::ptr_eq(&first, &second));

        assert_eq!(downcast::<i64>(&val).unwrap_err(), "i64");
    }
}
