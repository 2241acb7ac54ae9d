//! Single-record parked location storage

use log::debug;

use crate::error::Result;
use crate::types::GeoCoordinate;

/// Fixed identity of the one parked location record
pub const PARKED_LOCATION_ID: u32 = 1;

/// Persistent store for the parked location
///
/// Backed by the host's key-value or record store. There is only ever one
/// record, written under [`PARKED_LOCATION_ID`].
pub trait ParkedLocationStore {
    /// Read the saved location, `None` if the car was never parked
    fn load(&self) -> Result<Option<GeoCoordinate>>;

    /// Insert or replace the saved location
    fn upsert(&mut self, location: GeoCoordinate) -> Result<()>;
}

type ChangeListener = Box<dyn FnMut(GeoCoordinate)>;

/// In-process store with change notification
///
/// Useful for hosts without persistence and for tests. Listeners registered
/// with [`on_change`](Self::on_change) are called after every upsert.
#[derive(Default)]
pub struct MemoryStore {
    location: Option<GeoCoordinate>,
    listeners: Vec<ChangeListener>,
}

impl MemoryStore {
    /// Create an empty store with no parked location
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a parked location
    pub fn with_location(location: GeoCoordinate) -> Self {
        Self {
            location: Some(location),
            listeners: Vec::new(),
        }
    }

    /// Register a listener called with each newly saved location
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(GeoCoordinate) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }
}

impl ParkedLocationStore for MemoryStore {
    fn load(&self) -> Result<Option<GeoCoordinate>> {
        Ok(self.location)
    }

    fn upsert(&mut self, location: GeoCoordinate) -> Result<()> {
        debug!(
            "parked location {} set to {:.6}, {:.6}",
            PARKED_LOCATION_ID,
            location.latitude(),
            location.longitude()
        );
        self.location = Some(location);
        for listener in self.listeners.iter_mut() {
            listener(location);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_empty_store_loads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn test_upsert_replaces_single_record() {
        let first = GeoCoordinate::new(51.1279, 1.3136).unwrap();
        let second = GeoCoordinate::new(51.1300, 1.3200).unwrap();
        let mut store = MemoryStore::with_location(first);

        store.upsert(second).unwrap();
        assert_eq!(store.load(), Ok(Some(second)));
    }

    #[test]
    fn test_change_listeners_notified() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = MemoryStore::new();

        let sink = Rc::clone(&seen);
        store.on_change(move |location| sink.borrow_mut().push(location));

        let location = GeoCoordinate::new(10.0, 20.0).unwrap();
        store.upsert(location).unwrap();

        assert_eq!(*seen.borrow(), vec![location]);
    }
}
