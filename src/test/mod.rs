
pub(crate) use fixtures::*;
