// vim: tw=80
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{
    *,
    spanned::Spanned
};

use crate::mock_method::MockMethod;

/// A `#[mockable]` trait and the mock struct generated for it.
pub(crate) struct MockTrait {
    /// The trait itself, with easymock's helper attributes removed
    item: ItemTrait,
    mock_ident: Ident,
    methods: Vec<MockMethod>
}

impl MockTrait {
    pub(crate) fn new(mut item: ItemTrait) -> Result<Self> {
        if !item.generics.params.is_empty() ||
            item.generics.where_clause.is_some()
        {
            return Err(Error::new(item.generics.span(),
                "generic traits are not supported"));
        }
        if !item.supertraits.is_empty() {
            return Err(Error::new(item.supertraits.span(),
                "traits with supertraits are not supported"));
        }
        let mut methods = Vec::new();
        for ti in item.items.iter_mut() {
            match ti {
                TraitItem::Fn(f) => methods.push(MockMethod::new(f)?),
                other => {
                    return Err(Error::new(other.span(),
                        "only methods can be mocked"));
                }
            }
        }
        let mock_ident = format_ident!("Mock{}", item.ident);
        Ok(MockTrait{item, mock_ident, methods})
    }
}

impl ToTokens for MockTrait {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let item = &self.item;
        let vis = &item.vis;
        let unsafety = &item.unsafety;
        let trait_ident = &item.ident;
        let mock_ident = &self.mock_ident;
        let mock_name = mock_ident.to_string();
        let doc = format!("Mock implementation of [`{}`]", trait_ident);
        let declarations = self.methods.iter().map(MockMethod::declaration);
        let helpers = self.methods.iter().map(MockMethod::helpers);
        let implementations = self.methods.iter()
            .filter(|m| !m.is_sealed())
            .map(MockMethod::implementation);
        quote!(
            #item

            #[doc = #doc]
            #vis struct #mock_ident {
                mock: ::easymock::Mock
            }

            #[allow(dead_code)]
            impl #mock_ident {
                /// Create a loose mock: calls nothing was set up for return
                /// the zero value of their return type.
                pub fn new() -> Self {
                    Self::with_behavior(::easymock::MockBehavior::Loose)
                }

                /// Create a strict mock: calls nothing was set up for panic.
                pub fn strict() -> Self {
                    Self::with_behavior(::easymock::MockBehavior::Strict)
                }

                pub fn with_behavior(behavior: ::easymock::MockBehavior)
                    -> Self
                {
                    let mock = ::easymock::Mock::new(#mock_name)
                        .with_behavior(behavior);
                    #(#declarations)*
                    #mock_ident { mock }
                }

                /// The engine behind this mock
                pub fn mock(&self) -> &::easymock::Mock {
                    &self.mock
                }

                #(#helpers)*
            }

            impl ::std::default::Default for #mock_ident {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl ::std::fmt::Debug for #mock_ident {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>)
                    -> ::std::fmt::Result
                {
                    ::std::fmt::Display::fmt(&self.mock, f)
                }
            }

            #unsafety impl #trait_ident for #mock_ident {
                #(#implementations)*
            }
        ).to_tokens(tokens);
    }
}
