use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Ident, LitStr, parse_quote};

const REPO: &str = "repo";
const GARDE: &str = "garde";
const REPO_ID: &str = "id";

fn is_id_field(f: &Field) -> syn::Result<bool> {
    for attr in &f.attrs {
        if attr.path().is_ident(REPO) {
            let name: Ident = attr.parse_args()?;
            if name == REPO_ID {
                return Ok(true);
            }
            return Err(syn::Error::new(name.span(), "Unknown field attribute, expected id"));
        }
    }
    Ok(false)
}

fn table_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut table = None;
    for attr in attrs {
        if attr.path().is_ident(REPO) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let name: LitStr = meta.value()?.parse()?;
                    table = Some(name.value());
                    Ok(())
                } else {
                    Err(meta.error("Unsupported repo attribute, expected table"))
                }
            })?;
        }
    }
    Ok(table)
}

/// Keeps only garde rules, every field of the payload must be validated or skipped
fn prepare_create_field(f: &Field) -> Field {
    let mut field = f.clone();
    field.attrs.retain(|a| a.path().is_ident(GARDE));
    if field.attrs.is_empty() {
        field.attrs.push(parse_quote!(#[garde(skip)]));
    }
    field.vis = syn::Visibility::Public(syn::token::Pub::default());
    field
}

pub fn repository(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let entity_ident = input.ident.clone();
    let entity_name = entity_ident.to_string();
    let prefix = entity_name.to_lowercase();
    let table = table_name(&input.attrs)?.ok_or_else(|| {
        syn::Error::new(
            input.ident.span(),
            "Missing table name, use #[repo(table = \"...\")]",
        )
    })?;

    let Data::Struct(data) = input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "Unexpected data type, should be struct",
        ));
    };

    let mut id_field = None;
    let mut value_fields = Vec::new();
    for f in data.fields.iter() {
        if f.ident.is_none() {
            return Err(syn::Error::new(
                input.ident.span(),
                "Only structs with named fields are supported",
            ));
        }
        if is_id_field(f)? {
            id_field = f.ident.clone();
        } else {
            value_fields.push(f);
        }
    }
    let id_ident = id_field.ok_or_else(|| {
        syn::Error::new(
            input.ident.span(),
            "Missing primary key, mark it with #[repo(id)]",
        )
    })?;
    let id_col = id_ident.to_string();

    // unwrap is ok as unnamed fields are rejected above
    let value_idents = value_fields
        .iter()
        .map(|f| f.ident.clone().unwrap())
        .collect::<Vec<_>>();
    let value_cols = value_idents.iter().map(|i| i.to_string()).collect::<Vec<_>>();

    let create_fields = value_fields.iter().map(|f| prepare_create_field(f));
    let create_struct_name = format_ident!("Create{}", entity_name);
    let create_struct = quote! {
        #[derive(Debug, serde::Serialize, serde::Deserialize, Clone, garde::Validate)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub struct #create_struct_name {
            #(#create_fields,)*
        }
    };

    let prefixed_id = format!("{prefix}_{id_col}");
    let prefixed_values = value_cols.iter().map(|c| format!("{prefix}_{c}"));
    let from_row_prefixed = quote! {
        impl crate::FromRowPrefixed for #entity_ident {
            fn from_row_prefixed(row: &crate::ChosenRow) -> std::result::Result<Self, sqlx::Error> {
                use sqlx::Row as _;
                Ok(Self {
                    #id_ident: row.try_get(#prefixed_id)?,
                    #(#value_idents: row.try_get(#prefixed_values)?,)*
                })
            }
        }
    };

    let all_cols = std::iter::once(id_col.clone())
        .chain(value_cols.iter().cloned())
        .collect::<Vec<_>>()
        .join(",");
    let placeholders = value_cols.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let insert_cmd = format!(
        "INSERT INTO {table}({}) VALUES ({placeholders}) RETURNING {all_cols}",
        value_cols.join(",")
    );
    let select_one_query = format!("SELECT {all_cols} FROM {table} WHERE {id_col} = ?");
    let select_all_query = format!("SELECT {all_cols} FROM {table} ORDER BY {id_col}");
    let exists_query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {id_col} = ?)");
    let count_cmd = format!("SELECT count(*) FROM {table}");
    let bound_fields = value_idents
        .iter()
        .map(|f| quote!(.bind(&payload.#f)))
        .collect::<Vec<_>>();

    let repo_name = format_ident!("{}Repository", entity_name);
    let repo_impl_name = format_ident!("{}RepositoryImpl", entity_name);

    let repo_impl = quote! {
        pub type #repo_name = #repo_impl_name<sqlx::Pool<crate::ChosenDB>>;

        pub struct #repo_impl_name<E> {
            executor: E,
        }

        impl<'c, E> #repo_impl_name<E>
        where
            for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
        {
            pub fn new(executor: E) -> Self {
                Self { executor }
            }

            pub async fn create(&self, payload: #create_struct_name) -> crate::error::Result<#entity_ident> {
                create(&payload, &self.executor).await
            }

            pub async fn get(&self, id: i64) -> crate::error::Result<#entity_ident> {
                get(id, &self.executor).await
            }

            pub async fn exists(&self, id: i64) -> crate::error::Result<bool> {
                exists(id, &self.executor).await
            }

            pub async fn count(&self) -> crate::error::Result<i64> {
                let count: i64 = sqlx::query_scalar(#count_cmd)
                    .fetch_one(&self.executor)
                    .await?;
                Ok(count)
            }

            pub async fn list_all(&self) -> crate::error::Result<Vec<#entity_ident>> {
                let records = sqlx::query_as::<_, #entity_ident>(#select_all_query)
                    .fetch_all(&self.executor)
                    .await?;
                Ok(records)
            }
        }

        pub async fn create<'c, X>(payload: &#create_struct_name, executor: X) -> crate::error::Result<#entity_ident>
        where
            X: sqlx::Executor<'c, Database = crate::ChosenDB>,
        {
            garde::Validate::validate(payload).map_err(crate::validate::ValidationError::from)?;
            let record = sqlx::query_as::<_, #entity_ident>(#insert_cmd)
                #(#bound_fields)*
                .fetch_one(executor)
                .await?;
            tracing::debug!("Created {} {}", #entity_name, record.#id_ident);
            Ok(record)
        }

        pub async fn get<'c, X>(id: i64, executor: X) -> crate::error::Result<#entity_ident>
        where
            X: sqlx::Executor<'c, Database = crate::ChosenDB>,
        {
            sqlx::query_as::<_, #entity_ident>(#select_one_query)
                .bind(id)
                .fetch_optional(executor)
                .await?
                .ok_or_else(|| crate::error::Error::RecordNotFound(#entity_name.to_string()))
        }

        pub async fn exists<'c, X>(id: i64, executor: X) -> crate::error::Result<bool>
        where
            X: sqlx::Executor<'c, Database = crate::ChosenDB>,
        {
            let found: bool = sqlx::query_scalar(#exists_query)
                .bind(id)
                .fetch_one(executor)
                .await?;
            Ok(found)
        }
    };

    Ok(quote! {
        #create_struct
        #from_row_prefixed
        #repo_impl
    })
}
