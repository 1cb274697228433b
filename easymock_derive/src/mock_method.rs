// vim: tw=80
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    *,
    spanned::Spanned
};

/// One argument of a mocked method
struct MockArg {
    ident: Ident,
    /// The type the engine records and matches against.  By-reference
    /// arguments are recorded as their owned form.
    owned: Type,
    /// Converts the live argument into its recorded value
    value: TokenStream
}

impl MockArg {
    fn new(ident: Ident, ty: &Type) -> Result<Self> {
        match ty {
            Type::Reference(r) if r.mutability.is_some() => {
                Err(Error::new(ty.span(),
                    "mutable reference arguments are not supported"))
            },
            Type::Reference(r) => {
                let elem = &r.elem;
                Ok(MockArg {
                    owned: parse_quote!(
                        <#elem as ::std::borrow::ToOwned>::Owned
                    ),
                    value: quote!(::std::borrow::ToOwned::to_owned(#ident)),
                    ident
                })
            },
            Type::ImplTrait(_) => {
                Err(Error::new(ty.span(),
                    "impl Trait arguments are not supported"))
            },
            _ => Ok(MockArg {
                owned: ty.clone(),
                value: quote!(#ident),
                ident
            })
        }
    }
}

/// Remove any `#[easymock(...)]` attributes, returning whether the method was
/// marked `sealed`.
fn take_sealed(attrs: &mut Vec<Attribute>) -> Result<bool> {
    let mut sealed = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("easymock")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("sealed") {
                sealed = true;
                Ok(())
            } else {
                Err(meta.error("unknown easymock attribute"))
            }
        })?;
    }
    attrs.retain(|a| !a.path().is_ident("easymock"));
    Ok(sealed)
}

/// Is this type spelled `Result<..>`, under any path?  Aliases like
/// `io::Result<T>` count too.
fn is_result(ty: &Type) -> bool {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => {
            tp.path.segments.last()
                .map(|seg| seg.ident == "Result" &&
                     matches!(seg.arguments, PathArguments::AngleBracketed(_)))
                .unwrap_or(false)
        },
        _ => false
    }
}

/// A trait method, as seen by the mock struct.
pub(crate) struct MockMethod {
    /// The method's signature, with every argument pattern replaced by a
    /// plain identifier
    sig: Signature,
    args: Vec<MockArg>,
    output: Type,
    /// Returns some kind of `Result`, so configured errors become `Err`
    fallible: bool,
    /// Keeps its default body and can't be set up or verified
    sealed: bool
}

impl MockMethod {
    /// Parse a trait method, stripping any easymock attributes from it.
    pub(crate) fn new(item: &mut TraitItemFn) -> Result<Self> {
        let sealed = take_sealed(&mut item.attrs)?;
        if sealed && item.default.is_none() {
            return Err(Error::new(item.sig.span(),
                "a sealed method must have a default body"));
        }
        let mut sig = item.sig.clone();
        if let Some(a) = &sig.asyncness {
            return Err(Error::new(a.span(), "async methods are not supported"));
        }
        if !sig.generics.params.is_empty() ||
            sig.generics.where_clause.is_some()
        {
            return Err(Error::new(sig.generics.span(),
                "generic methods are not supported"));
        }
        if let Some(v) = &sig.variadic {
            return Err(Error::new(v.span(),
                "variadic methods are not supported"));
        }
        let mut has_receiver = false;
        let mut args = Vec::new();
        for (i, input) in sig.inputs.iter_mut().enumerate() {
            match input {
                FnArg::Receiver(_) => has_receiver = true,
                FnArg::Typed(pt) => {
                    let ident = match pt.pat.as_ref() {
                        Pat::Ident(pi) if pi.subpat.is_none() &&
                            pi.ident != "times" => pi.ident.clone(),
                        _ => format_ident!("arg{}", i)
                    };
                    *pt.pat = Pat::Ident(PatIdent {
                        attrs: Vec::new(),
                        by_ref: None,
                        mutability: None,
                        ident: ident.clone(),
                        subpat: None
                    });
                    args.push(MockArg::new(ident, &pt.ty)?);
                }
            }
        }
        if !has_receiver {
            return Err(Error::new(sig.ident.span(),
                "methods without a self receiver are not supported"));
        }
        let output: Type = match &sig.output {
            ReturnType::Default => parse_quote!(()),
            ReturnType::Type(_, ty) => match ty.as_ref() {
                Type::Reference(_) => {
                    return Err(Error::new(ty.span(),
                        "reference return types are not supported"));
                },
                Type::ImplTrait(_) => {
                    return Err(Error::new(ty.span(),
                        "impl Trait return types are not supported"));
                },
                ty => ty.clone()
            }
        };
        let fallible = is_result(&output);
        Ok(MockMethod{sig, args, output, fallible, sealed})
    }

    pub(crate) fn name(&self) -> &Ident {
        &self.sig.ident
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn signature_ident(&self) -> Ident {
        format_ident!("signature_{}", self.name())
    }

    fn call_ident(&self) -> Ident {
        format_ident!("call_{}", self.name())
    }

    /// Statement declaring this method to the engine, for the constructor.
    pub(crate) fn declaration(&self) -> TokenStream {
        let signature = self.signature_ident();
        let interception = if self.sealed {
            quote!(::easymock::Interception::Sealed)
        } else {
            quote!(::easymock::Interception::Intercepted)
        };
        quote!(mock.declare(Self::#signature(), #interception);)
    }

    /// Associated functions and methods of the mock struct
    pub(crate) fn helpers(&self) -> TokenStream {
        let name = self.name();
        let name_str = name.to_string();
        let output = &self.output;
        let signature = self.signature_ident();
        let call = self.call_ident();
        let idents = self.args.iter().map(|a| &a.ident).collect::<Vec<_>>();
        let owned = self.args.iter().map(|a| &a.owned).collect::<Vec<_>>();
        let call_doc = format!("Describe calls to `{}` with matching \
            arguments", name);
        let mut ts = quote!(
            fn #signature() -> ::easymock::OperationSignature {
                ::easymock::OperationSignature::named(#name_str)
                    #(.param::<#owned>())*
            }
            #[doc = #call_doc]
            pub fn #call(
                #(#idents: impl ::std::convert::Into<::easymock::Matcher<#owned>>),*
            ) -> ::easymock::Call<#output>
            {
                ::easymock::Call::new(#name_str)
                    #(.arg(::std::convert::Into::into(#idents)))*
            }
        );
        if !self.sealed {
            let setup = format_ident!("setup_{}", name);
            let verify = format_ident!("verify_{}", name);
            let setup_doc = format!("Configure the outcome of calls to `{}`",
                                    name);
            let verify_doc = format!("Check how many times `{}` was called \
                with matching arguments", name);
            ts.extend(quote!(
                #[doc = #setup_doc]
                pub fn #setup(&self,
                    #(#idents: impl ::std::convert::Into<::easymock::Matcher<#owned>>),*
                ) -> ::easymock::SetupBuilder<'_, #output>
                {
                    match self.mock.setup(Self::#call(#(#idents),*)) {
                        Ok(builder) => builder,
                        Err(e) => panic!("{}", e)
                    }
                }
                #[doc = #verify_doc]
                pub fn #verify(&self,
                    #(#idents: impl ::std::convert::Into<::easymock::Matcher<#owned>>,)*
                    times: ::easymock::Times
                ) -> ::std::result::Result<(), ::easymock::MockError>
                {
                    self.mock.verify(&Self::#call(#(#idents),*), times)
                }
            ));
        }
        ts
    }

    /// The method's implementation for the mock struct, or nothing if it keeps
    /// its default body.
    pub(crate) fn implementation(&self) -> TokenStream {
        if self.sealed {
            return TokenStream::new();
        }
        let sig = &self.sig;
        let signature = self.signature_ident();
        let values = self.args.iter().map(|a| &a.value);
        let dispatch = if self.fallible {
            format_ident!("dispatch_fallible")
        } else {
            format_ident!("dispatch")
        };
        quote!(
            #sig {
                let args = ::easymock::Arguments::new()
                    #(.with(#values))*;
                self.mock.interceptor().#dispatch(&Self::#signature(), args)
            }
        )
    }
}
