mod category;

pub use category::{Category, CategoryFilter, CategoryState, DeletedScope, NewCategory, ParentLink};
