pub mod error;
pub mod function_object;
pub mod heap;
pub mod object;
pub mod object_property;
pub mod symbol;
pub mod value;

pub mod operations {
    pub mod object;
    pub mod test_and_comparison;
    pub mod type_conversion;
}
