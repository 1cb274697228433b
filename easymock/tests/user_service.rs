// vim: tw=80
//! End-to-end use of a mocked service contract
use easymock::*;
use std::panic::{self, AssertUnwindSafe};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    Inactive,
    Active
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Access {
    pub key: String
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomError(pub &'static str);

#[mockable]
pub trait UserService {
    fn simplest_method(&self);
    fn method_returns_int(&self) -> i32;
    fn method_returns_string(&self) -> String;
    fn method_returns_enum(&self) -> UserStatus;
    fn method_returns_simple_object(&self) -> User;
    fn method_with_value_parameter(&self, number: i32) -> i32;
    fn method_returns_simple_object_with_parameter(&self, number: i32) -> User;
    fn get_user_access(&self, number: i32) -> Vec<Access>;
    fn update_user_access(&self, number: i32, access: &[Access])
        -> Vec<Access>;
    #[easymock(sealed)]
    fn describe(&self) -> String {
        format!("user service returning {}", self.method_returns_int())
    }
}

#[test]
fn returns_configured_value() {
    let mock = MockUserService::new();
    mock.setup_method_returns_int().returns(666);
    assert_eq!(666, mock.method_returns_int());
}

#[test]
fn wildcard_argument() {
    let mock = MockUserService::new();
    mock.setup_method_with_value_parameter(it::any()).returns(24);
    assert_eq!(24, mock.method_with_value_parameter(1));
    assert_eq!(24, mock.method_with_value_parameter(99));
}

#[test]
fn verify_unconfigured_calls() {
    let mock = MockUserService::new();
    for _ in 0..3 {
        mock.simplest_method();
    }
    mock.verify_simplest_method(Times::exactly(3)).unwrap();
    let e = mock.verify_simplest_method(Times::never()).unwrap_err();
    assert!(e.is_verification_failure());
    assert!(e.to_string().starts_with("MockUserService: Expected invocation \
        on the mock should never have been performed, but was 3 times: \
        simplest_method()"), "{}", e);
}

#[test]
fn throws_exactly_the_configured_error() {
    let mock = MockUserService::new();
    mock.setup_simplest_method().throws(CustomError("boom"));
    let payload = panic::catch_unwind(AssertUnwindSafe(|| mock.simplest_method()))
        .unwrap_err();
    assert_eq!(Some(&CustomError("boom")), payload.downcast_ref());
}

#[test]
fn verify_sealed_method() {
    let mock = MockUserService::new();
    mock.setup_method_returns_int().returns(3);
    assert_eq!("user service returning 3", mock.describe());
    let e = mock.mock()
        .verify(&MockUserService::call_describe(), Times::once())
        .unwrap_err();
    assert!(matches!(e, MockError::NonOverridableOperation{..}), "{}", e);
    let e = mock.mock().setup(MockUserService::call_describe()).err().unwrap();
    assert!(matches!(e, MockError::NonOverridableOperation{..}), "{}", e);
}

#[test]
fn zero_values() {
    let mock = MockUserService::new();
    mock.simplest_method();
    assert_eq!(0, mock.method_returns_int());
    assert_eq!("", mock.method_returns_string());
    assert_eq!(UserStatus::Inactive, mock.method_returns_enum());
    assert_eq!(User::default(), mock.method_returns_simple_object());
    assert!(mock.get_user_access(1).is_empty());
}

#[test]
fn returns_objects() {
    let mock = MockUserService::new();
    let user = User { id: 7, name: "Ada".to_owned() };
    mock.setup_method_returns_enum().returns(UserStatus::Active);
    mock.setup_method_returns_simple_object().returns(user.clone());
    mock.setup_method_returns_simple_object_with_parameter(7)
        .returns(user.clone());
    assert_eq!(UserStatus::Active, mock.method_returns_enum());
    assert_eq!(user, mock.method_returns_simple_object());
    assert_eq!(user, mock.method_returns_simple_object_with_parameter(7));
    assert_eq!(User::default(),
               mock.method_returns_simple_object_with_parameter(8));
}

#[test]
fn literal_arguments_select_setups() {
    let mock = MockUserService::new();
    mock.setup_method_with_value_parameter(1).returns(10);
    mock.setup_method_with_value_parameter(2).returns(20);
    assert_eq!(10, mock.method_with_value_parameter(1));
    assert_eq!(20, mock.method_with_value_parameter(2));
    assert_eq!(0, mock.method_with_value_parameter(3));
}

#[test]
fn most_recent_setup_wins() {
    let mock = MockUserService::new();
    mock.setup_method_with_value_parameter(it::any()).returns(1);
    mock.setup_method_with_value_parameter(5).returns(2);
    assert_eq!(2, mock.method_with_value_parameter(5));
    mock.setup_method_with_value_parameter(it::any()).returns(3);
    assert_eq!(3, mock.method_with_value_parameter(5));
}

#[test]
fn setup_without_outcome_returns_zero_value() {
    let mock = MockUserService::new();
    mock.setup_method_with_value_parameter(it::any()).returns(1);
    mock.setup_method_with_value_parameter(5);
    assert_eq!(0, mock.method_with_value_parameter(5));
    assert_eq!(1, mock.method_with_value_parameter(6));
}

#[test]
fn returns_with_computes_fresh_values() {
    let mock = MockUserService::new();
    mock.setup_get_user_access(1)
        .returns_with(|| vec![Access { key: "read".to_owned() }]);
    let mut first = mock.get_user_access(1);
    first.clear();
    assert_eq!(vec![Access { key: "read".to_owned() }],
               mock.get_user_access(1));
}

#[test]
fn slice_arguments_match_by_owned_value() {
    let mock = MockUserService::new();
    let access = vec![Access { key: "write".to_owned() }];
    mock.setup_update_user_access(1, access.clone()).returns(access.clone());
    assert_eq!(access, mock.update_user_access(1, &access));
    assert!(mock.update_user_access(1, &[]).is_empty());
    mock.verify_update_user_access(1, it::any(), Times::exactly(2)).unwrap();
    mock.verify_update_user_access(1, it::is(|a: &Vec<Access>| a.is_empty()),
                                   Times::once()).unwrap();
}

#[test]
fn verification_aggregates_across_setups() {
    let mock = MockUserService::new();
    mock.setup_method_with_value_parameter(1).returns(10);
    mock.setup_method_with_value_parameter(2).returns(20);
    mock.method_with_value_parameter(1);
    mock.method_with_value_parameter(2);
    mock.method_with_value_parameter(3);
    mock.verify_method_with_value_parameter(it::any(), Times::exactly(3))
        .unwrap();
    mock.verify_method_with_value_parameter(2, Times::once()).unwrap();
    mock.verify_method_with_value_parameter(4, Times::never()).unwrap();
}

#[test]
fn verification_does_not_mutate() {
    let mock = MockUserService::new();
    mock.method_returns_int();
    for _ in 0..3 {
        mock.verify_method_returns_int(Times::once()).unwrap();
    }
}

#[test]
fn setup_counts_its_calls() {
    let mock = MockUserService::new();
    let mut setup = mock.setup_method_with_value_parameter(1);
    setup.returns(10);
    mock.method_with_value_parameter(1);
    mock.method_with_value_parameter(2);
    assert_eq!(1, setup.invocation_count());
}

#[test]
fn failure_lists_performed_invocations() {
    let mock = MockUserService::new();
    mock.method_with_value_parameter(4);
    mock.method_with_value_parameter(5);
    let e = mock.verify_method_with_value_parameter(6, Times::at_least_once())
        .unwrap_err();
    assert_eq!("MockUserService: Expected invocation on the mock at least \
        once, but was never performed: method_with_value_parameter(6)\n\
        Performed invocations:\n  method_with_value_parameter(4)\n  \
        method_with_value_parameter(5)", e.to_string());
}
