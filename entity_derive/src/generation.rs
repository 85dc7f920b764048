//! Code generation for `#[derive(Entity)]`
//!
//! Generates the `Entity` implementation, one capability implementation per
//! verb attribute and the matching contract.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Error, Ident, Result};

use crate::parsing::{EntityInfo, FieldInfo, VerbDecl, VerbKind};

pub fn generate_entity_impl(name: &Ident, entity: &EntityInfo, fields: &[FieldInfo]) -> TokenStream {
    let entity_name = &entity.name;
    let database = &entity.database;

    let restrictions = fields.iter().map(|field| {
        let field_name = &field.name;
        let restriction = restriction_tokens(field);
        quote! { .field(#field_name, #restriction) }
    });

    let extra_restrictions = entity.extra.as_ref().map(|path| {
        quote! {
            fn extra_restrictions() -> ::dbable::db_object::Restrictions {
                #path()
            }
        }
    });

    let declarations = entity.verbs.iter().map(|verb| {
        let method = format_ident!("{}", contract_method(verb.kind));
        quote! { .#method() }
    });

    quote! {
        impl ::dbable::db_object::Entity for #name {
            const NAME: &'static str = #entity_name;
            const DATABASE: &'static str = #database;

            fn restrictions() -> ::dbable::db_object::Restrictions {
                ::dbable::db_object::Restrictions::new()
                    #(#restrictions)*
            }

            #extra_restrictions

            fn contract() -> ::dbable::db_object::Contract<Self> {
                ::dbable::db_object::Contract::new()
                    #(#declarations)*
            }
        }
    }
}

fn restriction_tokens(field: &FieldInfo) -> TokenStream {
    let base = match &field.with {
        Some(path) => quote! { #path() },
        None => {
            let constructor = format_ident!("{}", field.kind);
            quote! { ::dbable::db_object::Restriction::#constructor() }
        }
    };
    let nullable = field.nullable.then(|| quote! { .nullable() });
    let default = field
        .default
        .as_ref()
        .map(|expr| quote! { .with_default(#expr) });
    quote! { #base #nullable #default }
}

fn contract_method(kind: VerbKind) -> &'static str {
    match kind {
        VerbKind::Load => "loadable",
        VerbKind::Create => "creatable",
        VerbKind::Save => "savable",
        VerbKind::Delete => "deletable",
        VerbKind::Paginated => "paginated",
        VerbKind::Scrollable => "scrollable",
    }
}

fn parameter_set_tokens(verb: &VerbDecl) -> TokenStream {
    let params = &verb.params;
    let version = verb.version.map(|v| quote! { .with_version(#v) });
    quote! {
        {
            let names: &[&str] = &[#(#params),*];
            ::dbable::db_object::ParameterSet::from(names) #version
        }
    }
}

pub fn generate_capability_impls(name: &Ident, entity: &EntityInfo, fields: &[FieldInfo]) -> Result<TokenStream> {
    let mut impls = Vec::new();

    for verb in &entity.verbs {
        let params = parameter_set_tokens(verb);
        let tokens = match verb.kind {
            VerbKind::Load => quote! {
                impl ::dbable::db_object::Loadable for #name {
                    fn load_params() -> ::dbable::db_object::ParameterSet #params
                }
            },
            VerbKind::Create => quote! {
                impl ::dbable::db_object::Creatable for #name {
                    fn create_params() -> ::dbable::db_object::ParameterSet #params
                }
            },
            VerbKind::Save => quote! {
                impl ::dbable::db_object::Savable for #name {
                    fn save_params() -> ::dbable::db_object::ParameterSet #params
                }
            },
            VerbKind::Delete => quote! {
                impl ::dbable::db_object::Deletable for #name {
                    fn delete_params() -> ::dbable::db_object::ParameterSet #params
                }
            },
            VerbKind::Paginated => quote! {
                impl ::dbable::db_object::Listable for #name {
                    fn list_params() -> ::dbable::db_object::ParameterSet #params
                }

                impl ::dbable::db_object::Paginated for #name {}
            },
            VerbKind::Scrollable => {
                let cursor = verb
                    .cursor
                    .as_ref()
                    .ok_or_else(|| Error::new(name.span(), "#[scrollable] requires `cursor = <field>`"))?;
                if !fields.iter().any(|field| &field.ident == cursor) {
                    return Err(Error::new(
                        cursor.span(),
                        format!("cursor field '{}' does not exist on {}", cursor, name),
                    ));
                }
                quote! {
                    impl ::dbable::db_object::Listable for #name {
                        fn list_params() -> ::dbable::db_object::ParameterSet #params
                    }

                    impl ::dbable::db_object::Scrollable for #name {
                        fn to_after(&self) -> ::dbable::db_object::serde_json::Value {
                            ::dbable::db_object::serde_json::to_value(&self.#cursor).unwrap_or_default()
                        }
                    }
                }
            }
        };
        impls.push(tokens);
    }

    Ok(quote! { #(#impls)* })
}
