pub mod categories;
pub mod foods;
