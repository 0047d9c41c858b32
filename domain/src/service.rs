use crate::{Address, AddressId, AddressPatch, AddressRepository, CoreError, NewAddress};

/// Application service over an address repository.
///
/// It stays generic over the repository so the same code runs against the
/// in-memory adapter in tests and SQLite in the server. Its only job beyond
/// delegation is to turn in-band absence into `CoreError::NotFound`.
pub struct AddressService<R: AddressRepository> {
    repo: R,
}

impl<R: AddressRepository> AddressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new address and return it with its assigned id.
    pub fn create(&self, input: NewAddress) -> Result<Address, CoreError> {
        self.repo.create(input)
    }

    /// List every stored address.
    pub fn list(&self) -> Result<Vec<Address>, CoreError> {
        self.repo.list()
    }

    pub fn get(&self, id: AddressId) -> Result<Address, CoreError> {
        self.repo.get(id)?.ok_or(CoreError::NotFound)
    }

    /// Apply a partial update; fields absent from `patch` keep their value.
    pub fn update(&self, id: AddressId, patch: &AddressPatch) -> Result<Address, CoreError> {
        self.repo.update(id, patch)?.ok_or(CoreError::NotFound)
    }

    pub fn delete(&self, id: AddressId) -> Result<(), CoreError> {
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(CoreError::NotFound)
        }
    }
}
