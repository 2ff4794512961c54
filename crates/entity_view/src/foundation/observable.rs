//! Observable values and lists
//!
//! Single-threaded change notification used to bind views to entity state.
//! Key principles:
//! - Listeners are registered explicitly and identified by a [`ListenerKey`]
//! - Notification is synchronous, at the moment the value is mutated
//! - Listeners run on a snapshot of the listener set, so they may subscribe,
//!   unsubscribe or mutate other observables re-entrantly

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

new_key_type! {
    /// Handle identifying a registered listener
    pub struct ListenerKey;
}

type ChangeListener<T> = Rc<dyn Fn(&T, &T)>;

/// A value that notifies listeners whenever it changes
///
/// Setting a value equal to the current one is not a change and notifies
/// nobody.
pub struct Property<T> {
    value: RefCell<T>,
    listeners: RefCell<SlotMap<ListenerKey, ChangeListener<T>>>,
}

impl<T: Clone + PartialEq> Property<T> {
    /// Create a property holding `value`
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value, notifying listeners with `(old, new)` if it changed
    pub fn set(&self, value: T) {
        let old = {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return;
            }
            std::mem::replace(&mut *current, value.clone())
        };

        for listener in self.snapshot() {
            listener(&old, &value);
        }
    }

    /// Register a listener called with `(old, new)` after every change
    pub fn subscribe(&self, listener: impl Fn(&T, &T) + 'static) -> ListenerKey {
        self.listeners.borrow_mut().insert(Rc::new(listener))
    }

    /// Remove a listener, returns false if it was not registered
    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        self.listeners.borrow_mut().remove(key).is_some()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn snapshot(&self) -> Vec<ChangeListener<T>> {
        self.listeners.borrow().values().cloned().collect()
    }
}

impl<T: Clone + PartialEq + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

/// One contiguous edit inside a list change batch
#[derive(Debug, Clone, PartialEq)]
pub enum ListEdit<T> {
    /// `items` were inserted starting at `from`
    Added {
        /// Index of the first inserted item
        from: usize,
        /// Inserted items
        items: Vec<T>,
    },
    /// `items` were removed starting at `from`
    Removed {
        /// Index the first removed item had
        from: usize,
        /// Removed items
        items: Vec<T>,
    },
}

type ListListener<T> = Rc<dyn Fn(&[ListEdit<T>])>;

/// An ordered collection that notifies listeners with batches of edits
pub struct ObservableList<T> {
    items: RefCell<Vec<T>>,
    listeners: RefCell<SlotMap<ListenerKey, ListListener<T>>>,
}

impl<T: Clone> ObservableList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Copy of the current items
    pub fn to_vec(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Run `f` over the current items without cloning them
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Append one item
    pub fn push(&self, item: T) {
        let from = {
            let mut items = self.items.borrow_mut();
            items.push(item.clone());
            items.len() - 1
        };
        self.notify(&[ListEdit::Added {
            from,
            items: vec![item],
        }]);
    }

    /// Append several items as a single edit
    pub fn extend(&self, new_items: impl IntoIterator<Item = T>) {
        let added: Vec<T> = new_items.into_iter().collect();
        if added.is_empty() {
            return;
        }
        let from = {
            let mut items = self.items.borrow_mut();
            let from = items.len();
            items.extend(added.iter().cloned());
            from
        };
        self.notify(&[ListEdit::Added { from, items: added }]);
    }

    /// Remove the item at `index`, returns `None` if out of range
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.notify(&[ListEdit::Removed {
            from: index,
            items: vec![removed.clone()],
        }]);
        Some(removed)
    }

    /// Remove every item
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.items.borrow_mut());
        if removed.is_empty() {
            return;
        }
        self.notify(&[ListEdit::Removed {
            from: 0,
            items: removed,
        }]);
    }

    /// Replace the whole content; notifies one batch with a removal and an addition
    pub fn set_all(&self, new_items: impl IntoIterator<Item = T>) {
        let added: Vec<T> = new_items.into_iter().collect();
        let removed = std::mem::replace(&mut *self.items.borrow_mut(), added.clone());

        let mut edits = Vec::with_capacity(2);
        if !removed.is_empty() {
            edits.push(ListEdit::Removed {
                from: 0,
                items: removed,
            });
        }
        if !added.is_empty() {
            edits.push(ListEdit::Added {
                from: 0,
                items: added,
            });
        }
        if !edits.is_empty() {
            self.notify(&edits);
        }
    }

    /// Register a listener called with each batch of edits
    pub fn subscribe(&self, listener: impl Fn(&[ListEdit<T>]) + 'static) -> ListenerKey {
        self.listeners.borrow_mut().insert(Rc::new(listener))
    }

    /// Remove a listener, returns false if it was not registered
    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        self.listeners.borrow_mut().remove(key).is_some()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self, edits: &[ListEdit<T>]) {
        let listeners: Vec<ListListener<T>> = self.listeners.borrow().values().cloned().collect();
        log::trace!("list change: {} edit(s), {} listener(s)", edits.len(), listeners.len());
        for listener in listeners {
            listener(edits);
        }
    }
}

impl<T: Clone> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &*self.items.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_property_notifies_on_change_only() {
        let prop = Property::new(1.0_f64);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        prop.subscribe(move |old, new| sink.borrow_mut().push((*old, *new)));

        prop.set(1.0);
        prop.set(2.5);
        prop.set(2.5);
        prop.set(-1.0);

        assert_eq!(*calls.borrow(), vec![(1.0, 2.5), (2.5, -1.0)]);
        assert_eq!(prop.get(), -1.0);
    }

    #[test]
    fn test_property_unsubscribe() {
        let prop = Property::new(false);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let key = prop.subscribe(move |_, _| c.set(c.get() + 1));

        prop.set(true);
        assert!(prop.unsubscribe(key));
        assert!(!prop.unsubscribe(key));
        prop.set(false);

        assert_eq!(count.get(), 1);
        assert_eq!(prop.listener_count(), 0);
    }

    #[test]
    fn test_property_reentrant_listener() {
        let prop = Rc::new(Property::new(0_i32));
        let weak = Rc::downgrade(&prop);
        prop.subscribe(move |_, new| {
            if *new < 3 {
                if let Some(p) = weak.upgrade() {
                    p.set(new + 1);
                }
            }
        });

        prop.set(1);
        assert_eq!(prop.get(), 3);
    }

    #[test]
    fn test_list_edits() {
        let list = ObservableList::new();
        let batches = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&batches);
        list.subscribe(move |edits: &[ListEdit<u32>]| sink.borrow_mut().push(edits.to_vec()));

        list.push(1);
        list.extend([2, 3]);
        assert_eq!(list.remove(0), Some(1));
        assert_eq!(list.remove(10), None);
        list.set_all([7]);
        list.clear();
        list.clear();

        let batches = batches.borrow();
        assert_eq!(batches.len(), 5);
        assert_eq!(batches[1], vec![ListEdit::Added { from: 1, items: vec![2, 3] }]);
        assert_eq!(batches[2], vec![ListEdit::Removed { from: 0, items: vec![1] }]);
        assert_eq!(batches[3].len(), 2);
        assert!(list.is_empty());
    }
}
