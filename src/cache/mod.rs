pub(crate) mod descriptor;
pub(crate) mod store;

pub(crate) use descriptor::{QueryDescriptor, QueryMode};
pub(crate) use store::{QueryCache, QueryState, QueryStatus, Records, Subscription};
