// vim: tw=80
//! Configured errors are raised unchanged
use easymock::*;
use std::{
    io,
    panic::{self, AssertUnwindSafe}
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceError {
    pub code: u32
}

#[mockable]
trait Store {
    fn put(&self, key: &str, value: u32);
    fn get(&self, key: &str) -> Result<u32, ServiceError>;
    fn read(&self) -> io::Result<Vec<u8>>;
}

#[test]
fn fallible_returns_err() {
    let mock = MockStore::new();
    mock.setup_get("missing").throws(ServiceError { code: 404 });
    mock.setup_get("present").returns(Ok(7));
    assert_eq!(Err(ServiceError { code: 404 }), mock.get("missing"));
    assert_eq!(Ok(7), mock.get("present"));
}

#[test]
fn fallible_unconfigured_is_ok_default() {
    let mock = MockStore::new();
    assert_eq!(Ok(0), mock.get("anything"));
}

#[test]
fn fallible_alias() {
    let mock = MockStore::new();
    mock.setup_read()
        .throws_with(|| io::Error::new(io::ErrorKind::NotFound, "gone"));
    let e = mock.read().unwrap_err();
    assert_eq!(io::ErrorKind::NotFound, e.kind());
    // A fresh error is built for every call
    assert_eq!(io::ErrorKind::NotFound, mock.read().unwrap_err().kind());
}

#[test]
fn fallible_with_foreign_error_panics() {
    let mock = MockStore::new();
    mock.setup_get("x").throws("not a ServiceError");
    let payload = panic::catch_unwind(AssertUnwindSafe(|| mock.get("x")))
        .unwrap_err();
    assert_eq!(Some(&"not a ServiceError"), payload.downcast_ref::<&str>());
}

#[test]
fn infallible_panics_with_payload() {
    let mock = MockStore::new();
    mock.setup_put(it::any(), 1).throws(ServiceError { code: 500 });
    mock.put("a", 2);
    let payload = panic::catch_unwind(AssertUnwindSafe(|| mock.put("a", 1)))
        .unwrap_err();
    assert_eq!(Some(&ServiceError { code: 500 }), payload.downcast_ref());
}

#[test]
fn throws_default() {
    let mock = MockStore::new();
    mock.setup_get(it::any()).throws_default::<ServiceError>();
    assert_eq!(Err(ServiceError::default()), mock.get("k"));
}

#[test]
fn thrown_calls_are_counted() {
    let mock = MockStore::new();
    mock.setup_put(it::any(), it::any()).throws(ServiceError { code: 1 });
    for _ in 0..2 {
        let _ = panic::catch_unwind(AssertUnwindSafe(|| mock.put("k", 0)));
    }
    mock.verify_put("k", it::any(), Times::exactly(2)).unwrap();
}

#[test]
fn returns_replaces_throws() {
    let mock = MockStore::new();
    let mut setup = mock.setup_get("k");
    setup.throws(ServiceError { code: 1 });
    assert!(mock.get("k").is_err());
    setup.returns(Ok(3));
    assert_eq!(Ok(3), mock.get("k"));
}
