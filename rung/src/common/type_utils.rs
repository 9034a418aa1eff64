use parking_lot::RwLock;
use std::sync::Arc;

pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}

pub trait ReadExecutor<T: ?Sized> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

impl<T> ReadExecutor<T> for Atomic<T> {
    #[inline]
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let read_guard = self.read();
        f(&*read_guard)
    }
}

pub trait WriteExecutor<T: ?Sized> {
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> WriteExecutor<T> for Atomic<T> {
    #[inline]
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut write_guard = self.write();
        f(&mut *write_guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with() {
        let value = atomic(5);
        assert_eq!(value.read_with(|v| *v), 5);
    }

    #[test]
    fn test_write_with_is_visible_to_clones() {
        let value = atomic(vec![1]);
        let shared = value.clone();
        shared.write_with(|v| v.push(2));
        assert_eq!(value.read_with(|v| v.clone()), vec![1, 2]);
    }
}
