// Local repo abstraction supporting memory or sqlite (feature-gated).

use domain::adapters::memory_repo::InMemoryRepo;
use domain::{Address, AddressId, AddressPatch, AddressRepository, CoreError, NewAddress};

pub enum AnyRepo {
    Memory(InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite_adapter::SqliteRepo),
}

impl AnyRepo {
    pub fn memory() -> Self {
        Self::Memory(InMemoryRepo::new())
    }
}

impl AddressRepository for AnyRepo {
    fn create(&self, input: NewAddress) -> Result<Address, CoreError> {
        match self {
            Self::Memory(r) => r.create(input),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.create(input),
        }
    }

    fn list(&self) -> Result<Vec<Address>, CoreError> {
        match self {
            Self::Memory(r) => r.list(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.list(),
        }
    }

    fn get(&self, id: AddressId) -> Result<Option<Address>, CoreError> {
        match self {
            Self::Memory(r) => r.get(id),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.get(id),
        }
    }

    fn update(&self, id: AddressId, patch: &AddressPatch) -> Result<Option<Address>, CoreError> {
        match self {
            Self::Memory(r) => r.update(id, patch),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.update(id, patch),
        }
    }

    fn delete(&self, id: AddressId) -> Result<bool, CoreError> {
        match self {
            Self::Memory(r) => r.delete(id),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.delete(id),
        }
    }
}
