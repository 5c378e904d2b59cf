use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input, spanned::Spanned};

/// Generates a `rowbridge::RowModel` impl: a `get_<field>` / `set_<field>`
/// pair per named field and a constructor that defaults every field.
#[proc_macro_derive(RowModel, attributes(row_model))]
pub fn derive_row_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_row_model(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_row_model(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.generics,
            "RowModel does not support generic structs yet",
        ));
    }

    let model_options = parse_model_options(&input.attrs)?;

    let data_struct = match input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "RowModel can only be derived for structs",
            ));
        }
    };

    let named_fields = match data_struct.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "RowModel requires named fields",
            ));
        }
    };

    let mut all_fields = Vec::<Ident>::new();
    let mut accessors = Vec::<TokenStream2>::new();

    for field in named_fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "RowModel requires named fields"))?;
        let options = parse_field_options(&field.attrs)?;
        all_fields.push(ident.clone());

        if options.skip {
            continue;
        }

        let attribute = options
            .rename
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
        accessors.push(accessor_pair_tokens(&ident, &field.ty, &attribute));
    }

    let type_name = model_options
        .type_name
        .unwrap_or_else(|| struct_name.to_string());

    let constructor = if model_options.constructor {
        quote! {
            let construct: ::rowbridge::Constructor<Self> = || Self {
                #( #all_fields: ::core::default::Default::default(), )*
            };
            ::core::option::Option::Some(construct)
        }
    } else {
        quote! { ::core::option::Option::None }
    };

    Ok(quote! {
        impl ::rowbridge::RowModel for #struct_name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn methods() -> ::std::vec::Vec<::rowbridge::Method<Self>> {
                #[allow(unused_mut)]
                let mut methods: ::std::vec::Vec<::rowbridge::Method<Self>> = ::std::vec::Vec::new();
                #( #accessors )*
                methods
            }

            fn constructor() -> ::core::option::Option<::rowbridge::Constructor<Self>> {
                #constructor
            }
        }
    })
}

fn accessor_pair_tokens(ident: &Ident, ty: &Type, attribute: &str) -> TokenStream2 {
    let getter_name = format!("get_{}", attribute);
    let setter_name = format!("set_{}", attribute);

    quote! {
        let get: ::rowbridge::Getter<Self> = |target: &Self| {
            ::rowbridge::Value::from(::core::clone::Clone::clone(&target.#ident))
        };
        methods.push(::rowbridge::Method::getter(#getter_name, get));

        let set: ::rowbridge::Setter<Self> = |target: &mut Self, value: ::rowbridge::Value| {
            target.#ident = <#ty as ::rowbridge::FromValue>::from_value(value)?;
            ::core::result::Result::Ok(())
        };
        methods.push(::rowbridge::Method::setter(
            #setter_name,
            <#ty as ::rowbridge::FromValue>::REPRESENTATION,
            set,
        ));
    }
}

struct ModelOptions {
    type_name: Option<String>,
    constructor: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            type_name: None,
            constructor: true,
        }
    }
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    rename: Option<String>,
}

fn parse_model_options(attrs: &[syn::Attribute]) -> syn::Result<ModelOptions> {
    let mut options = ModelOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("row_model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("no_constructor") {
                options.constructor = false;
                return Ok(());
            }

            if meta.path.is_ident("name") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.type_name = Some(lit.value());
                return Ok(());
            }

            Err(meta.error(
                "Unsupported #[row_model(...)] option. Supported: no_constructor, name = \"...\"",
            ))
        })?;
    }

    Ok(options)
}

fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("row_model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                return Ok(());
            }

            if meta.path.is_ident("rename") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.rename = Some(lit.value());
                return Ok(());
            }

            Err(meta.error(
                "Unsupported #[row_model(...)] option on field. Supported: skip, rename = \"...\"",
            ))
        })?;

        if options.skip && options.rename.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "#[row_model(skip)] cannot be combined with rename",
            ));
        }
    }

    Ok(options)
}
