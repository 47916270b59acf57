use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DataEnum, Ident, LitStr, spanned::Spanned};

pub(crate) fn expand(enum_ident: &Ident, data: &DataEnum) -> syn::Result<TokenStream> {
    let mut idents = Vec::new();
    let mut labels = Vec::new();

    for variant in &data.variants {
        let label = label_attr(&variant.attrs)?.ok_or_else(|| {
            syn::Error::new(variant.span(), "missing #[label(\"...\")] on variant")
        })?;
        idents.push(&variant.ident);
        labels.push(label);
    }

    Ok(quote! {
        impl casedrops::Labeled for #enum_ident {
            const ALL: &'static [Self] = &[#(Self::#idents),*];

            fn label(&self) -> &'static str {
                match self {
                    #(Self::#idents => #labels,)*
                }
            }
        }

        impl ::core::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(<Self as casedrops::Labeled>::label(self))
            }
        }
    })
}

fn label_attr(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut found = None;
    for attr in attrs {
        if attr.path().is_ident("label") {
            found = Some(attr.parse_args::<LitStr>()?);
        }
    }
    Ok(found)
}
