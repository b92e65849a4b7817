pub mod load;
pub mod models;
pub mod range;
