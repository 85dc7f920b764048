//! Parsing utilities for entity, verb and field attributes
//!
//! This module handles the parsing of `#[entity]`, the verb attributes
//! (`#[load]`, `#[create]`, `#[save]`, `#[delete]`, `#[paginated]`,
//! `#[scrollable]`) and `#[restrict]`, and validates the names that end up
//! in `CALL` statements.

use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, Error, Expr, Fields, Ident, LitInt, LitStr, Path, Result, Type};

/// Restriction constructors a field may name with `#[restrict(kind = "..")]`
pub const RESTRICTION_KINDS: &[&str] = &[
    "any", "int", "float", "string", "boolean", "datetime", "timestamp", "json", "object", "list",
];

/// Validate a procedure prefix or database name and return syn::Error for
/// better proc macro error handling
pub fn validate_identifier_syn(kind: &str, name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid {} '{}': {}", kind, name, e)))
}

/// Mirrors db_object::validation so that compile-time validation matches
/// the registration check
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // MySQL identifier limit
    if name.len() > 64 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 64)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters, underscores and '$' are allowed", name));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbKind {
    Load,
    Create,
    Save,
    Delete,
    Paginated,
    Scrollable,
}

impl VerbKind {
    const ALL: [VerbKind; 6] = [
        VerbKind::Load,
        VerbKind::Create,
        VerbKind::Save,
        VerbKind::Delete,
        VerbKind::Paginated,
        VerbKind::Scrollable,
    ];

    pub fn attribute(&self) -> &'static str {
        match self {
            VerbKind::Load => "load",
            VerbKind::Create => "create",
            VerbKind::Save => "save",
            VerbKind::Delete => "delete",
            VerbKind::Paginated => "paginated",
            VerbKind::Scrollable => "scrollable",
        }
    }
}

/// One verb attribute, e.g. `#[load(id, version = 2)]`
#[derive(Debug)]
pub struct VerbDecl {
    pub kind: VerbKind,
    pub params: Vec<String>,
    pub version: Option<u32>,
    /// Field projected to the cursor value, scrollable only
    pub cursor: Option<Ident>,
}

#[derive(Debug)]
pub struct EntityInfo {
    pub name: String,
    pub database: String,
    pub extra: Option<Path>,
    pub verbs: Vec<VerbDecl>,
}

impl EntityInfo {
    pub fn verb(&self, kind: VerbKind) -> Option<&VerbDecl> {
        self.verbs.iter().find(|verb| verb.kind == kind)
    }
}

/// A field with its restriction settings
#[derive(Debug)]
pub struct FieldInfo {
    pub ident: Ident,
    pub name: String,
    pub kind: String,
    pub nullable: bool,
    pub default: Option<Expr>,
    /// Path of a `fn() -> Restriction` replacing the inferred restriction
    pub with: Option<Path>,
}

pub fn parse_entity_attributes(ident: &Ident, attrs: &[Attribute]) -> Result<EntityInfo> {
    let mut name = None;
    let mut database = None;
    let mut extra = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("entity")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("database") {
                database = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("extra") {
                extra = Some(meta.value()?.parse::<LitStr>()?.parse::<Path>()?);
            } else {
                return Err(meta.error("unknown entity attribute, expected `name`, `database` or `extra`"));
            }
            Ok(())
        })?;
    }

    let name = name.unwrap_or_else(|| ident.unraw().to_string());
    validate_identifier_syn("entity name", &name, ident.span())?;

    let database = database.ok_or_else(|| {
        Error::new(
            ident.span(),
            "entity attribute is required: add #[entity(database = \"db_name\")] to your struct",
        )
    })?;
    validate_identifier_syn("database", &database, ident.span())?;

    let mut verbs = Vec::new();
    for kind in VerbKind::ALL {
        for attr in attrs.iter().filter(|attr| attr.path().is_ident(kind.attribute())) {
            if verbs.iter().any(|verb: &VerbDecl| verb.kind == kind) {
                return Err(Error::new_spanned(
                    attr,
                    format!("#[{}] is declared more than once", kind.attribute()),
                ));
            }
            verbs.push(parse_verb(kind, attr)?);
        }
    }

    let info = EntityInfo {
        name,
        database,
        extra,
        verbs,
    };
    if info.verb(VerbKind::Paginated).is_some() && info.verb(VerbKind::Scrollable).is_some() {
        return Err(Error::new(
            ident.span(),
            "#[paginated] and #[scrollable] are mutually exclusive",
        ));
    }
    Ok(info)
}

fn parse_verb(kind: VerbKind, attr: &Attribute) -> Result<VerbDecl> {
    let mut params = Vec::new();
    let mut version = None;
    let mut cursor = None;

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("version") {
            version = Some(meta.value()?.parse::<LitInt>()?.base10_parse::<u32>()?);
        } else if meta.path.is_ident("cursor") && kind == VerbKind::Scrollable {
            cursor = Some(meta.value()?.parse::<Ident>()?);
        } else {
            let param = meta
                .path
                .get_ident()
                .ok_or_else(|| meta.error("expected a parameter name"))?;
            params.push(param.unraw().to_string());
        }
        Ok(())
    })?;

    if kind == VerbKind::Scrollable && cursor.is_none() {
        return Err(Error::new_spanned(
            attr,
            "#[scrollable] requires `cursor = <field>` naming the field resumed after",
        ));
    }

    Ok(VerbDecl {
        kind,
        params,
        version,
        cursor,
    })
}

pub fn parse_field_attributes(data: &Data) -> Result<Vec<FieldInfo>> {
    if let Data::Struct(data_struct) = data {
        if let Fields::Named(fields_named) = &data_struct.fields {
            let mut fields = Vec::new();
            for field in &fields_named.named {
                let ident = field
                    .ident
                    .clone()
                    .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
                fields.push(parse_field(ident, &field.ty, &field.attrs)?);
            }
            return Ok(fields);
        }
    }

    Err(Error::new(
        proc_macro2::Span::call_site(),
        "Entity can only be derived for structs with named fields",
    ))
}

fn parse_field(ident: Ident, ty: &Type, attrs: &[Attribute]) -> Result<FieldInfo> {
    let type_string = quote!(#ty).to_string();
    let mut kind = type_mapping::rust_type_to_restriction(&type_string).to_string();
    let mut nullable = type_mapping::is_optional_type(&type_string);
    let mut default = None;
    let mut with = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("restrict")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let lit = meta.value()?.parse::<LitStr>()?;
                if !RESTRICTION_KINDS.contains(&lit.value().as_str()) {
                    return Err(Error::new(
                        lit.span(),
                        format!("unknown restriction kind, expected one of {}", RESTRICTION_KINDS.join(", ")),
                    ));
                }
                kind = lit.value();
            } else if meta.path.is_ident("nullable") {
                nullable = true;
            } else if meta.path.is_ident("default") {
                default = Some(meta.value()?.parse::<Expr>()?);
            } else if meta.path.is_ident("with") {
                with = Some(meta.value()?.parse::<LitStr>()?.parse::<Path>()?);
            } else {
                return Err(meta.error("unknown restrict attribute, expected `kind`, `nullable`, `default` or `with`"));
            }
            Ok(())
        })?;
    }

    Ok(FieldInfo {
        name: ident.unraw().to_string(),
        ident,
        kind,
        nullable,
        default,
        with,
    })
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use syn::parse_quote;

    fn validate(name: &str) {
        if let Err(e) = validate_identifier_syn("database", name, proc_macro2::Span::call_site()) {
            panic!("{}", e);
        }
    }

    #[test]
    fn test_valid_names() {
        validate("testing");
        validate("User");
        validate("_private");
        validate("db$2");
    }

    #[test]
    #[should_panic(expected = "Invalid database")]
    fn test_invalid_start() {
        validate("2fast");
    }

    #[test]
    #[should_panic(expected = "Invalid database")]
    fn test_injection() {
        validate("testing`; DROP DATABASE testing; --");
    }

    #[test]
    fn test_parse_entity_attributes() {
        let input: syn::DeriveInput = parse_quote! {
            #[entity(database = "testing", extra = "post_extra")]
            #[load(id)]
            #[scrollable(after, limit, version = 2, cursor = id)]
            struct Post {
                id: i64,
            }
        };
        let info = parse_entity_attributes(&input.ident, &input.attrs).unwrap();
        assert_eq!(info.name, "Post");
        assert_eq!(info.database, "testing");
        assert!(info.extra.is_some());

        let scroll = info.verb(VerbKind::Scrollable).unwrap();
        assert_eq!(scroll.params, vec!["after", "limit"]);
        assert_eq!(scroll.version, Some(2));
        assert_eq!(scroll.cursor.as_ref().unwrap().to_string(), "id");
        assert_eq!(info.verb(VerbKind::Load).unwrap().params, vec!["id"]);
        assert!(info.verb(VerbKind::Save).is_none());
    }

    #[test]
    fn test_both_pagination_variants_are_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            #[entity(database = "testing")]
            #[paginated(page)]
            #[scrollable(after, limit, cursor = id)]
            struct Post {
                id: i64,
            }
        };
        let err = parse_entity_attributes(&input.ident, &input.attrs).unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_database_is_required() {
        let input: syn::DeriveInput = parse_quote! {
            #[load(id)]
            struct Post {
                id: i64,
            }
        };
        assert!(parse_entity_attributes(&input.ident, &input.attrs).is_err());
    }

    #[test]
    fn test_field_restrictions_are_inferred() {
        let input: syn::DeriveInput = parse_quote! {
            struct User {
                id: Option<i64>,
                email: String,
                #[restrict(kind = "datetime", default = "2020-01-01 00:00:00")]
                created: String,
                #[restrict(with = "password_restriction")]
                password: String,
            }
        };
        let fields = parse_field_attributes(&input.data).unwrap();
        assert_eq!((fields[0].kind.as_str(), fields[0].nullable), ("int", true));
        assert_eq!((fields[1].kind.as_str(), fields[1].nullable), ("string", false));
        assert_eq!(fields[2].kind, "datetime");
        assert!(fields[2].default.is_some());
        assert!(fields[3].with.is_some());
    }

    #[test]
    fn test_unknown_restriction_kind() {
        let input: syn::DeriveInput = parse_quote! {
            struct User {
                #[restrict(kind = "uuid")]
                id: String,
            }
        };
        assert!(parse_field_attributes(&input.data).is_err());
    }
}
