//! Procedural macros for procedure-backed entities
//!
//! This crate provides the `Entity` derive, which generates the entity's
//! restriction table, its capability implementations and its contract.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod parsing;

use generation::{generate_capability_impls, generate_entity_impl};
use parsing::{parse_entity_attributes, parse_field_attributes};

/// Derive macro for the Entity trait and its capabilities
///
/// Restrictions are inferred from field types (`Option<T>` is nullable) and
/// can be adjusted with `#[restrict(..)]`. Each verb attribute lists the
/// procedure parameters in binding order.
///
/// ```rust,ignore
/// use dbable::prelude::*;
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
/// #[entity(database = "blog", extra = "post_extra")]
/// #[load(id)]
/// #[create(title, body)]
/// #[save(id, title, body)]
/// #[delete(id)]
/// #[scrollable(after, limit, cursor = id)]
/// pub struct Post {
///     pub id: Option<i64>,
///     pub title: String,
///     #[restrict(default = "")]
///     pub body: String,
/// }
///
/// fn post_extra() -> Restrictions {
///     Restrictions::new()
///         .field("after", Restriction::int().with_default(0))
///         .field("limit", Restriction::int().with_default(20))
/// }
/// ```
#[proc_macro_derive(
    Entity,
    attributes(entity, load, create, save, delete, paginated, scrollable, restrict)
)]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    // Parse entity and verb attributes - handle errors properly
    let entity_info = match parse_entity_attributes(name, &input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    // Parse field attributes - handle errors properly
    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let entity_impl = generate_entity_impl(name, &entity_info, &field_info);

    let capability_impls = match generate_capability_impls(name, &entity_info, &field_info) {
        Ok(impls) => impls,
        Err(e) => return e.to_compile_error().into(),
    };

    let expanded = quote::quote! {
        #entity_impl
        #capability_impls
    };

    TokenStream::from(expanded)
}
