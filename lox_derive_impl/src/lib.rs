use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{Fields, ItemStruct, Path};

// refer to https://github.com/dtolnay/syn/blob/master/examples/heapsize/heapsize_derive/src/lib.rs

/// Expands `#[syntax_node(Enum::Variant)]` placed on an AST node struct.
///
/// The struct must have named fields, one of which is `id: NodeId`. The
/// expansion implements `SyntaxNode` for the struct and adds a `new_wrapped`
/// constructor taking every other field in declaration order. The constructor
/// assigns a fresh id and wraps the node into `Enum::Variant(Ptr::new(..))`.
///
/// `SyntaxNode`, `NodeId` and `Ptr` are resolved at the use site.
pub fn syntax_node(attr: TokenStream, input: TokenStream) -> TokenStream {
    expand(attr, input).unwrap_or_else(syn::Error::into_compile_error)
}

fn expand(attr: TokenStream, input: TokenStream) -> syn::Result<TokenStream> {
    let path = syn::parse2::<Path>(attr)?;
    if path.segments.len() != 2 {
        return Err(syn::Error::new_spanned(
            &path,
            "syntax_node expects a path of the form `Enum::Variant`",
        ));
    }
    let enum_name = &path.segments[0].ident;

    let item = syn::parse2::<ItemStruct>(input.clone())?;
    let name = &item.ident;

    let fields = match &item.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &item.ident,
                "syntax_node can only be used on structs with named fields",
            ))
        }
    };

    let mut has_id = false;
    let mut params = Vec::new();
    let mut args = Vec::new();

    for f in fields {
        let Some(ident) = &f.ident else { continue };
        if ident == "id" {
            if f.ty.to_token_stream().to_string() != "NodeId" {
                return Err(syn::Error::new_spanned(
                    &f.ty,
                    "the `id` field of a syntax node must have type `NodeId`",
                ));
            }
            has_id = true;
        } else {
            let ty = &f.ty;
            params.push(quote! { #ident: #ty });
            args.push(ident.clone());
        }
    }

    if !has_id {
        return Err(syn::Error::new_spanned(
            name,
            "syntax node must have a field named `id` of type `NodeId`",
        ));
    }

    Ok(quote! {
        #input

        impl SyntaxNode for #name {
            fn id(&self) -> NodeId {
                self.id
            }
        }

        impl #name {
            pub fn new_wrapped(#(#params),*) -> #enum_name {
                #path(Ptr::new(Self {
                    id: NodeId::next(),
                    #(#args),*
                }))
            }
        }
    })
}
