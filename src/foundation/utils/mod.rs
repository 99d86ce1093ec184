mod input_error;
mod pagination;
mod string_utils;

pub use input_error::InputError;
pub use pagination::*;
pub use string_utils::*;
