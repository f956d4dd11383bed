mod value_repo;

/// Derives a `Create*` payload, a repository and a prefixed row reader
/// for a small lookup entity.
///
/// The annotated struct must mark its primary key with `#[repo(id)]` and name
/// its table with `#[repo(table = "...")]`. Field level `#[garde(...)]`
/// rules are moved to the generated `Create*` struct.
#[proc_macro_derive(ValueRepository, attributes(repo, garde))]
pub fn value_repo(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    value_repo::repository(input)
}
