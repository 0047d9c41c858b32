//! Domain library for the Address Book.
//!
//! This crate holds the record types, the repository port (trait), and error
//! definitions. Keep adapters and IO concerns out of this crate; the only
//! adapter living here is the in-memory one used by tests and local demos.

use thiserror::Error;

/// System-assigned identity of an address record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressId(i64);

impl AddressId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse an id from a raw path segment.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CoreError::InvalidId(s.to_string()))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AddressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored address record.
#[derive(Clone, Debug, PartialEq)]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Input data for creating a new address. All fields are mandatory.
#[derive(Clone, Debug, PartialEq)]
pub struct NewAddress {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewAddress {
    /// Attach the id the store assigned to this row.
    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Partial update of an address. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddressPatch {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.latitude.is_none() && self.longitude.is_none()
    }

    /// Merge the supplied fields into `address`.
    pub fn apply_to(&self, address: &mut Address) {
        if let Some(name) = &self.name {
            address.name = name.clone();
        }
        if let Some(lat) = self.latitude {
            address.latitude = lat;
        }
        if let Some(lon) = self.longitude {
            address.longitude = lon;
        }
    }
}

/// Repository port for persisting and loading addresses.
///
/// Absence is reported in-band (`None` / `false`); `AddressService` turns it
/// into `CoreError::NotFound`.
pub trait AddressRepository: Send + Sync {
    /// Insert a new row; the store assigns the id.
    fn create(&self, input: NewAddress) -> Result<Address, CoreError>;
    /// All present rows in natural storage order.
    fn list(&self) -> Result<Vec<Address>, CoreError>;
    fn get(&self, id: AddressId) -> Result<Option<Address>, CoreError>;
    /// Merge `patch` into the row and return the result, or `None` if absent.
    fn update(&self, id: AddressId, patch: &AddressPatch) -> Result<Option<Address>, CoreError>;
    /// Remove the row permanently. Returns `false` if it did not exist.
    fn delete(&self, id: AddressId) -> Result<bool, CoreError>;
}

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid address id: {0}")]
    InvalidId(String),
    #[error("not found")]
    NotFound,
    #[error("repository error: {0}")]
    Repository(String),
}

/// Return a short about/version line for logging at startup.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - domain library loaded", pkg, ver)
}

pub mod adapters;
pub mod service;

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Address {
        Address {
            id: AddressId::new(1),
            name: "Home".into(),
            latitude: 1.0,
            longitude: 2.0,
        }
    }

    #[test]
    fn address_id_parses_integers() {
        assert_eq!(AddressId::parse("42").unwrap(), AddressId::new(42));
        assert_eq!(AddressId::parse("-3").unwrap().get(), -3);
    }

    #[test]
    fn address_id_rejects_garbage() {
        let err = AddressId::parse("abc").unwrap_err();
        match err {
            CoreError::InvalidId(raw) => assert_eq!(raw, "abc"),
            _ => panic!("expected InvalidId"),
        }
        assert!(AddressId::parse("1.5").is_err());
        assert!(AddressId::parse("").is_err());
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut addr = home();
        let patch = AddressPatch {
            latitude: Some(5.5),
            ..AddressPatch::default()
        };
        patch.apply_to(&mut addr);
        assert_eq!(addr.name, "Home");
        assert_eq!(addr.latitude, 5.5);
        assert_eq!(addr.longitude, 2.0);
    }

    #[test]
    fn empty_patch_is_noop() {
        let patch = AddressPatch::default();
        assert!(patch.is_empty());
        let mut addr = home();
        patch.apply_to(&mut addr);
        assert_eq!(addr, home());
    }
}
