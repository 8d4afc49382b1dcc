mod category_store;
#[cfg(test)]
mod memory_category_store;
mod pg_category_store;

pub use category_store::{CategoryStore, CategoryUnitOfWork};
#[cfg(test)]
pub use memory_category_store::MemoryCategoryStore;
pub use pg_category_store::PgCategoryStore;
