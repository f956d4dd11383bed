use crate::lookup_api;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use tailspin_dal::publisher::{Publisher, PublisherRepository};

lookup_api!(Publisher);
