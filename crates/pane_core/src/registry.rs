//! Window registry
//!
//! Live windows are stored in a generation-checked arena, so a [`WindowId`]
//! held past its window's destruction simply stops resolving instead of
//! aliasing a newer window. Insertion order is tracked separately and is the
//! order used whenever every window is visited.

use pane_platform::NativeHandle;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, SlotMap};

use crate::error::{Error, Result};

new_key_type! {
    /// Stable identifier of a registered window
    pub struct WindowId;
}

impl WindowId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation
    ///
    /// A value that did not come from [`WindowId::to_raw`] names no window.
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

struct Entry<T> {
    handle: NativeHandle,
    record: T,
}

/// Result of removing a window
#[derive(Debug)]
pub struct Removed<T> {
    pub handle: NativeHandle,
    pub record: T,
    /// The registry is now empty; the application should consider exiting
    pub was_last: bool,
}

/// Ordered collection of live window records
pub struct WindowRegistry<T> {
    entries: SlotMap<WindowId, Entry<T>>,
    order: Vec<WindowId>,
    by_handle: FxHashMap<NativeHandle, WindowId>,
}

impl<T> Default for WindowRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WindowRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            by_handle: FxHashMap::default(),
        }
    }

    /// Append a window record
    ///
    /// Fails without side effects if `handle` is already registered.
    pub fn insert(&mut self, handle: NativeHandle, record: T) -> Result<WindowId> {
        if self.by_handle.contains_key(&handle) {
            return Err(Error::DuplicateHandle(handle));
        }

        let id = self.entries.insert(Entry { handle, record });
        self.order.push(id);
        self.by_handle.insert(handle, id);
        Ok(id)
    }

    /// Look up the window registered for a native handle
    pub fn find_by_handle(&self, handle: NativeHandle) -> Option<WindowId> {
        self.by_handle.get(&handle).copied()
    }

    /// Unlink a window record
    pub fn remove(&mut self, id: WindowId) -> Option<Removed<T>> {
        let entry = self.entries.remove(id)?;
        self.order.retain(|&other| other != id);
        self.by_handle.remove(&entry.handle);

        Some(Removed {
            handle: entry.handle,
            record: entry.record,
            was_last: self.order.is_empty(),
        })
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: WindowId) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.record)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut T> {
        self.entries.get_mut(id).map(|entry| &mut entry.record)
    }

    /// Native handle of a registered window
    pub fn handle(&self, id: WindowId) -> Option<NativeHandle> {
        self.entries.get(id).map(|entry| entry.handle)
    }

    /// Window ids in insertion order
    pub fn ids(&self) -> &[WindowId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&'static str]) -> (WindowRegistry<&'static str>, Vec<WindowId>) {
        let mut registry = WindowRegistry::new();
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| registry.insert(NativeHandle(i as u64 + 1), *name).unwrap())
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_insert_preserves_order() {
        let (registry, ids) = registry_with(&["a", "b", "c"]);
        assert_eq!(registry.ids(), ids.as_slice());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_handle_rejected() {
        let (mut registry, _) = registry_with(&["a"]);
        let result = registry.insert(NativeHandle(1), "again");
        assert!(matches!(result, Err(Error::DuplicateHandle(NativeHandle(1)))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_by_handle() {
        let (registry, ids) = registry_with(&["a", "b"]);
        assert_eq!(registry.find_by_handle(NativeHandle(2)), Some(ids[1]));
        assert_eq!(registry.find_by_handle(NativeHandle(99)), None);
    }

    #[test]
    fn test_last_window_signal() {
        let (mut registry, ids) = registry_with(&["a", "b"]);

        let removed = registry.remove(ids[0]).unwrap();
        assert_eq!(removed.record, "a");
        assert!(!removed.was_last);
        assert!(!registry.is_empty());

        let removed = registry.remove(ids[1]).unwrap();
        assert!(removed.was_last);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let (mut registry, ids) = registry_with(&["a", "b", "c", "d"]);
        registry.remove(ids[1]);
        assert_eq!(registry.ids(), &[ids[0], ids[2], ids[3]]);
        registry.remove(ids[0]);
        assert_eq!(registry.ids(), &[ids[2], ids[3]]);
        registry.remove(ids[3]);
        assert_eq!(registry.ids(), &[ids[2]]);
        assert_eq!(registry.find_by_handle(NativeHandle(1)), None);
    }

    #[test]
    fn test_stale_id_does_not_resolve() {
        let (mut registry, ids) = registry_with(&["a"]);
        registry.remove(ids[0]);
        let fresh = registry.insert(NativeHandle(1), "b").unwrap();

        assert!(registry.get(ids[0]).is_none());
        assert!(registry.remove(ids[0]).is_none());
        assert_eq!(registry.get(fresh), Some(&"b"));
    }

    #[test]
    fn test_raw_round_trip() {
        let (registry, ids) = registry_with(&["a"]);
        assert_eq!(WindowId::from_raw(ids[0].to_raw()), ids[0]);
        assert!(registry.contains(WindowId::from_raw(ids[0].to_raw())));
    }
}
