use serde::{Deserialize, Serialize};
use tailspin_macros::ValueRepository;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow, ValueRepository)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[repo(table = "publishers")]
pub struct Publisher {
    #[repo(id)]
    pub id: i64,
    #[garde(custom(crate::validate::valid_name))]
    pub name: String,
}
