pub(crate) mod str_utils;
pub(crate) mod utils_for_test;
