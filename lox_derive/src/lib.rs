use proc_macro::TokenStream;

/// Attaches a `NodeId` and a boxed constructor to an AST node struct.
///
/// Used as `#[syntax_node(Expr::Binary)]`, see `lox_derive_impl::syntax_node`.
#[proc_macro_attribute]
pub fn syntax_node(attr: TokenStream, input: TokenStream) -> TokenStream {
    lox_derive_impl::syntax_node(attr.into(), input.into()).into()
}
