pub mod traversals;
pub mod use_cases;
