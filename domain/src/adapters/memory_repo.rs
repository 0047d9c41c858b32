use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{Address, AddressId, AddressPatch, AddressRepository, CoreError, NewAddress};

/// Simple in-memory repository for tests and ephemeral dev runs.
///
/// Ids come from a monotonic counter and are never handed out twice, even
/// after the row they named is deleted.
pub struct InMemoryRepo {
    inner: Mutex<Inner>,
}

struct Inner {
    rows: BTreeMap<AddressId, Address>,
    last_id: i64,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, CoreError> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressRepository for InMemoryRepo {
    fn create(&self, input: NewAddress) -> Result<Address, CoreError> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let address = input.into_address(AddressId::new(inner.last_id));
        inner.rows.insert(address.id, address.clone());
        Ok(address)
    }

    fn list(&self) -> Result<Vec<Address>, CoreError> {
        let inner = self.lock()?;
        Ok(inner.rows.values().cloned().collect())
    }

    fn get(&self, id: AddressId) -> Result<Option<Address>, CoreError> {
        let inner = self.lock()?;
        Ok(inner.rows.get(&id).cloned())
    }

    fn update(&self, id: AddressId, patch: &AddressPatch) -> Result<Option<Address>, CoreError> {
        let mut inner = self.lock()?;
        Ok(inner.rows.get_mut(&id).map(|row| {
            patch.apply_to(row);
            row.clone()
        }))
    }

    fn delete(&self, id: AddressId) -> Result<bool, CoreError> {
        let mut inner = self.lock()?;
        Ok(inner.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_addr(name: &str) -> NewAddress {
        NewAddress {
            name: name.into(),
            latitude: 10.0,
            longitude: 20.0,
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let repo = InMemoryRepo::new();
        let a = repo.create(new_addr("a")).unwrap();
        let b = repo.create(new_addr("b")).unwrap();
        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
    }

    #[test]
    fn list_is_in_id_order() {
        let repo = InMemoryRepo::new();
        for name in ["c", "a", "b"] {
            repo.create(new_addr(name)).unwrap();
        }
        let names: Vec<String> = repo.list().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn update_missing_returns_none() {
        let repo = InMemoryRepo::new();
        let patch = AddressPatch {
            name: Some("x".into()),
            ..AddressPatch::default()
        };
        assert!(repo.update(AddressId::new(7), &patch).unwrap().is_none());
    }

    #[test]
    fn delete_reports_presence() {
        let repo = InMemoryRepo::new();
        let a = repo.create(new_addr("a")).unwrap();
        assert!(repo.delete(a.id).unwrap());
        assert!(!repo.delete(a.id).unwrap());
        assert!(repo.get(a.id).unwrap().is_none());
    }
}
