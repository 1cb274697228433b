// vim: tw=80
//! Non-Send return values, for single-threaded tests
use easymock::*;
use std::{rc::Rc, sync::Arc, thread};

#[mockable]
trait Foo {
    fn foo(&self) -> Rc<u32>;
}

#[test]
fn returns_st() {
    let mock = MockFoo::new();
    let value = Rc::new(42u32);
    let shared = value.clone();
    mock.setup_foo().returns_st(move || shared.clone());
    let r = mock.foo();
    assert_eq!(42, *r);
    assert_eq!(3, Rc::strong_count(&value));
}

#[test]
fn returns_st_other_thread() {
    let mock = Arc::new(MockFoo::new());
    mock.setup_foo().returns_st(|| Rc::new(42u32));
    let m = mock.clone();
    let r = thread::spawn(move || {
        let _ = m.foo();
    }).join();
    assert!(r.is_err());
}
