// vim: tw=80
//! Proc Macros for use with EasyMock
//!
//! You probably don't want to use this crate directly.  Instead, use its
//! reexports via the [`easymock`](../easymock/index.html) crate.

extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::spanned::Spanned;

mod mock_method;
mod mock_trait;
use crate::mock_trait::MockTrait;

fn do_mockable(attrs: TokenStream, input: TokenStream) -> TokenStream {
    if !attrs.is_empty() {
        return syn::Error::new(attrs.span(), "#[mockable] takes no arguments")
            .to_compile_error();
    }
    let item = match syn::parse2::<syn::Item>(input) {
        Ok(syn::Item::Trait(item)) => item,
        Ok(item) => {
            return syn::Error::new(item.span(),
                "#[mockable] can only be applied to traits")
                .to_compile_error();
        },
        Err(e) => return e.to_compile_error()
    };
    match MockTrait::new(item) {
        Ok(mock) => mock.into_token_stream(),
        Err(e) => e.to_compile_error()
    }
}

/// Generate a mock implementation of a trait.
///
/// For a trait named `Foo`, `#[mockable]` emits the trait unchanged plus a
/// `MockFoo` struct that implements it by forwarding every call to an
/// [`easymock::Mock`](../easymock/struct.Mock.html).  For every method `bar`,
/// `MockFoo` gets:
///
/// * `setup_bar(args...)`: configure what matching calls return or raise.
/// * `verify_bar(args..., times)`: check how often matching calls happened.
/// * `call_bar(args...)`: the underlying [`Call`](../easymock/struct.Call.html),
///   for use with the `Mock` API directly.
///
/// Each argument of those helpers accepts either a plain value or a matcher
/// from the `it` module.  Arguments passed by reference are recorded, and
/// matched, by their owned type, so a `&str` argument is matched as a
/// `String`.
///
/// Methods with a default body may be marked `#[easymock(sealed)]`.  They
/// keep their default body and can't be set up or verified.
///
/// Only object-safe-style methods are supported: every method needs a `self`
/// receiver, may not be generic or `async`, may not take `&mut` arguments,
/// and must return an owned type that implements `Default` (or a `Result`
/// whose `Ok` type does).
///
/// See the [`easymock`](../easymock/index.html) crate docs for examples.
#[proc_macro_attribute]
pub fn mockable(attrs: proc_macro::TokenStream,
                input: proc_macro::TokenStream) -> proc_macro::TokenStream
{
    do_mockable(attrs.into(), input.into()).into()
}
