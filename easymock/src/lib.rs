// vim: tw=80
//! A call interception and verification engine for test doubles.
//!
//! EasyMock stands in for a trait's real implementation in unit tests.  It
//! intercepts every call made to the mock object, answers it from the
//! behaviors the test configured, and records it so the test can later check
//! how many times it happened.
//!
//! # User Guide
//!
//! * [`Getting started`](#getting-started)
//! * [`Return values`](#return-values)
//! * [`Errors`](#errors)
//! * [`Matching arguments`](#matching-arguments)
//! * [`Verifying calls`](#verifying-calls)
//! * [`Strict mocks`](#strict-mocks)
//! * [`Sealed methods`](#sealed-methods)
//! * [`Reference arguments`](#reference-arguments)
//! * [`Threads`](#threads)
//! * [`Without the macro`](#without-the-macro)
//!
//! ## Getting started
//!
//! Put [`#[mockable]`](mockable) on a trait.  It generates a `Mock` struct
//! named after the trait, which implements the trait plus a `setup_` and a
//! `verify_` helper for every method.
//!
//! ```
//! use easymock::*;
//!
//! #[mockable]
//! trait UserService {
//!     fn method_returns_int(&self) -> i32;
//! }
//!
//! fn report(service: &dyn UserService) -> String {
//!     format!("{} users", service.method_returns_int())
//! }
//!
//! let mock = MockUserService::new();
//! mock.setup_method_returns_int().returns(5);
//! assert_eq!("5 users", report(&mock));
//! mock.verify_method_returns_int(Times::once()).unwrap();
//! ```
//!
//! ## Return values
//!
//! A call that no setup accepts returns its return type's `Default` value.
//! So does a call accepted by a setup with no configured outcome.  Otherwise
//! the setup decides: [`returns`](SetupBuilder::returns) clones a fixed value,
//! [`returns_with`](SetupBuilder::returns_with) computes a fresh one per
//! call, and [`returns_st`](SetupBuilder::returns_st) does the same for
//! return types that aren't `Send`.
//!
//! ```
//! # use easymock::*;
//! #[mockable]
//! trait UserService {
//!     fn method_returns_string(&self) -> String;
//! }
//!
//! let mock = MockUserService::new();
//! assert_eq!("", mock.method_returns_string());
//! mock.setup_method_returns_string().returns("text".to_owned());
//! assert_eq!("text", mock.method_returns_string());
//! ```
//!
//! Setting up the same call again replaces the earlier behavior: when several
//! setups accept a call, the most recent one wins.
//!
//! ## Errors
//!
//! [`throws`](SetupBuilder::throws) makes matching calls fail.  For a method
//! returning `Result<T, E>`, a configured `E` is returned as `Err`.  Any other
//! method panics with the configured error as the panic payload, which
//! `std::panic::catch_unwind` hands back unchanged.
//!
//! ```
//! # use easymock::*;
//! #[derive(Clone, Debug, PartialEq)]
//! struct AccessDenied;
//!
//! #[mockable]
//! trait UserService {
//!     fn get_user_access(&self, user: u32) -> Result<bool, AccessDenied>;
//! }
//!
//! let mock = MockUserService::new();
//! mock.setup_get_user_access(7).throws(AccessDenied);
//! assert_eq!(Err(AccessDenied), mock.get_user_access(7));
//! assert_eq!(Ok(false), mock.get_user_access(8));
//! ```
//!
//! ## Matching arguments
//!
//! Every argument of a `setup_` or `verify_` helper is a [`Matcher`].  A
//! plain value matches by equality.  The [`it`] module has the rest:
//! wildcards, ranges, sets, and arbitrary predicates.  Any [`Predicate`]
//! from the [`predicate`] module can be used through [`it::matching`].
//!
//! ```
//! # use easymock::*;
//! #[mockable]
//! trait UserService {
//!     fn method_with_value_parameter(&self, value: i32) -> i32;
//! }
//!
//! let mock = MockUserService::new();
//! mock.setup_method_with_value_parameter(it::any()).returns(1);
//! mock.setup_method_with_value_parameter(
//!     it::in_range(10, 20, RangeKind::Inclusive).unwrap()
//! ).returns(2);
//! assert_eq!(1, mock.method_with_value_parameter(5));
//! assert_eq!(2, mock.method_with_value_parameter(15));
//! ```
//!
//! ## Verifying calls
//!
//! A `verify_` helper counts every recorded call whose arguments satisfy its
//! matchers, whichever setup answered it, and compares the count against a
//! [`Times`].  It returns [`MockError::VerificationFailed`] with a readable
//! message on a mismatch and never changes the mock's state.
//!
//! ```
//! # use easymock::*;
//! #[mockable]
//! trait UserService {
//!     fn method_with_value_parameter(&self, value: i32) -> i32;
//! }
//!
//! let mock = MockUserService::new();
//! mock.method_with_value_parameter(1);
//! mock.method_with_value_parameter(2);
//! mock.verify_method_with_value_parameter(it::any(), Times::exactly(2))
//!     .unwrap();
//! let e = mock.verify_method_with_value_parameter(3, Times::at_least_once())
//!     .unwrap_err();
//! assert!(e.is_verification_failure());
//! ```
//!
//! ## Strict mocks
//!
//! A mock created with `strict()` panics with [`MockError::NoSetup`] when a
//! call matches no setup.  The message explains why each setup rejected the
//! call.  The call is still recorded, so it counts during verification.
//!
//! ## Sealed methods
//!
//! A trait method with a default body can be marked `#[easymock(sealed)]`.
//! The mock then keeps the default body, and any attempt to set up or verify
//! it fails with [`MockError::NonOverridableOperation`].
//!
//! ```
//! # use easymock::*;
//! #[mockable]
//! trait Foo {
//!     fn foo(&self, x: u32) -> u32;
//!     #[easymock(sealed)]
//!     fn twice(&self, x: u32) -> u32 {
//!         2 * self.foo(x)
//!     }
//! }
//!
//! let mock = MockFoo::new();
//! mock.setup_foo(4).returns(5);
//! assert_eq!(10, mock.twice(4));
//! mock.verify_foo(4, Times::once()).unwrap();
//! let e = mock.mock().verify(&MockFoo::call_twice(4), Times::once())
//!     .unwrap_err();
//! assert!(matches!(e, MockError::NonOverridableOperation { .. }));
//! ```
//!
//! ## Reference arguments
//!
//! Recorded arguments must outlive the call, so reference arguments are
//! recorded, and matched, by their owned form.  A `&str` argument is matched
//! as a `String`, and a plain `&str` converts into that matcher.
//!
//! ## Threads
//!
//! A mock may be shared between threads.  Setup, dispatch and verification
//! are all safe to run concurrently, and no call is ever lost from the
//! counts.  Values configured with `returns_st` are the exception: the mocked
//! method must be called on the thread that configured them.
//!
//! ## Without the macro
//!
//! Generated mocks are thin wrappers around a [`Mock`].  A hand-written test
//! double can use it directly, describing calls with [`Call`] and
//! dispatching through its [`Interceptor`].
//!
//! ```
//! # use easymock::*;
//! let mock = Mock::new("MockCounter");
//! let sig = OperationSignature::named("next").param::<u32>();
//! mock.declare(sig.clone(), Interception::Intercepted);
//! mock.setup(Call::<u32>::new("next").arg(it::any::<u32>())).unwrap()
//!     .returns_with(|| 42);
//!
//! let r: u32 = mock.interceptor().dispatch(&sig, Arguments::new().with(1u32));
//! assert_eq!(42, r);
//! mock.verify(&Call::<u32>::new("next").value(1u32), Times::once()).unwrap();
//! ```

mod arguments;
mod error;
mod interceptor;
pub mod it;
mod matcher;
mod mock;
mod record;
mod signature;
mod times;

pub use crate::{
    arguments::{ArgValue, Arguments},
    error::MockError,
    interceptor::{Interception, Interceptor, Invocation, MockBehavior},
    matcher::{ArgMatcher, Matcher, MatcherKind, RangeKind},
    mock::{Call, Mock, SetupBuilder},
    record::{CallRecord, Outcome, RecordId, Reply},
    signature::{OperationSignature, ParamType},
    times::Times
};
pub use easymock_derive::mockable;
pub use predicates::prelude::{Predicate, PredicateBooleanExt, predicate};
