use crate::lookup_api;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use tailspin_dal::category::{Category, CategoryRepository};

lookup_api!(Category);
