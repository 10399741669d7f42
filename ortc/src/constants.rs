pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";
