pub use crate::{collections::*, error::*, query::*, values::*};

pub use crate::{prop_assert_changes, prop_assert_does_not_change, test_kavl_properties};
