//! Document-level pointer-down listeners and outside-click handling
//!
//! A [`Document`] stands in for the page the form is mounted in. Mounting a
//! form registers a pointer-down listener that closes its dropdowns when the
//! click lands outside the dropdown region; the returned [`MountedForm`] owns
//! the registration and releases it when unmounted or dropped.

use crate::form::FlightSearchForm;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Identifier of an element in the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target of a pointer-down: the clicked element and its ancestors, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    path: Vec<ElementId>,
}

impl ClickTarget {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(ElementId::new).collect(),
        }
    }

    /// The clicked element itself
    pub fn element(&self) -> Option<&ElementId> {
        self.path.last()
    }

    /// True when `region` is the clicked element or one of its ancestors
    pub fn is_within(&self, region: &ElementId) -> bool {
        self.path.contains(region)
    }
}

type PointerDownHandler = Box<dyn FnMut(&ClickTarget)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListenerId(u64);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    handlers: Vec<(ListenerId, PointerDownHandler)>,
    /// Nesting depth of `dispatch_pointer_down`
    dispatching: u32,
    /// Handlers taken out for a dispatch in progress
    in_flight: usize,
    /// In-flight handlers whose guard was dropped mid-dispatch
    pending_removals: Vec<ListenerId>,
}

/// Page-wide pointer-down event source.
///
/// Single-threaded. A handler may add listeners, drop guards or unmount forms
/// while an event is being dispatched: removed handlers are skipped for the
/// rest of that event and added ones first hear the next event.
#[derive(Clone, Default)]
pub struct Document {
    listeners: Rc<RefCell<Listeners>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every pointer-down. It stays registered until
    /// the returned guard is dropped.
    #[must_use = "dropping the guard removes the listener immediately"]
    pub fn add_pointer_down_listener<F>(&self, handler: F) -> ListenerGuard
    where
        F: FnMut(&ClickTarget) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.handlers.push((id, Box::new(handler)));
        debug!(listener = id.0, total = listeners.handlers.len(), "Pointer-down listener added");

        ListenerGuard {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Deliver a pointer-down to every handler registered before the call
    pub fn dispatch_pointer_down(&self, target: &ClickTarget) {
        // No borrow is held while handlers run
        let mut running = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.dispatching += 1;
            let running = std::mem::take(&mut listeners.handlers);
            listeners.in_flight += running.len();
            running
        };

        for (id, handler) in running.iter_mut() {
            if self.listeners.borrow().pending_removals.contains(id) {
                continue;
            }
            handler(target);
        }

        let removed: Vec<(ListenerId, PointerDownHandler)> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.dispatching -= 1;
            listeners.in_flight -= running.len();

            let (kept, removed): (Vec<_>, Vec<_>) = running
                .into_iter()
                .partition(|(id, _)| !listeners.pending_removals.contains(id));
            listeners
                .pending_removals
                .retain(|pending| !removed.iter().any(|(id, _)| id == pending));

            // Listeners added during the dispatch have higher ids and go after the kept ones
            let added = std::mem::replace(&mut listeners.handlers, kept);
            listeners.handlers.extend(added);
            removed
        };

        if !removed.is_empty() {
            debug!(removed = removed.len(), "Dropped listeners removed during dispatch");
        }
        // Closures may own forms whose guards borrow the list again on drop
        drop(removed);
    }

    pub fn listener_count(&self) -> usize {
        let listeners = self.listeners.borrow();
        listeners.handlers.len() + listeners.in_flight - listeners.pending_removals.len()
    }
}

/// Registration of a pointer-down listener; removes it on drop
pub struct ListenerGuard {
    listeners: Weak<RefCell<Listeners>>,
    id: ListenerId,
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id.0).finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };

        let removed = {
            let mut listeners = listeners.borrow_mut();
            match listeners.handlers.iter().position(|(id, _)| *id == self.id) {
                Some(index) => Some(listeners.handlers.remove(index)),
                None => {
                    if listeners.dispatching > 0 {
                        listeners.pending_removals.push(self.id);
                    }
                    None
                }
            }
        };
        debug!(listener = self.id.0, "Pointer-down listener removed");
        // Dropped after the borrow ends, since the closure may own another guard
        drop(removed);
    }
}

/// A form attached to a [`Document`], closing its dropdowns on outside clicks
pub struct MountedForm {
    form: Rc<RefCell<FlightSearchForm>>,
    listener: ListenerGuard,
}

impl fmt::Debug for MountedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedForm")
            .field("form", &self.form)
            .field("listener", &self.listener)
            .finish()
    }
}

impl FlightSearchForm {
    /// Attach the form to `document`, registering its outside-click listener
    pub fn mount(self, document: &Document) -> MountedForm {
        let form = Rc::new(RefCell::new(self));
        let weak = Rc::downgrade(&form);

        let listener = document.add_pointer_down_listener(move |target| {
            if let Some(form) = weak.upgrade() {
                form.borrow_mut().close_dropdown_if_outside(target);
            }
        });
        debug!("Flight search form mounted");

        MountedForm {
            form,
            listener,
        }
    }
}

impl MountedForm {
    pub fn form(&self) -> Ref<'_, FlightSearchForm> {
        self.form.borrow()
    }

    /// Mutable access for input handlers. Release the borrow before
    /// dispatching pointer events to the document.
    pub fn form_mut(&self) -> RefMut<'_, FlightSearchForm> {
        self.form.borrow_mut()
    }

    /// Detach from the document, removing the listener, and hand back the form
    pub fn unmount(self) -> FlightSearchForm {
        let MountedForm { form, listener } = self;
        drop(listener);
        debug!("Flight search form unmounted");

        Rc::try_unwrap(form)
            .map(RefCell::into_inner)
            .unwrap_or_else(|shared| shared.borrow().clone())
    }
}
