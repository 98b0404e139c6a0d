//! Command implementations.

pub mod fill;
pub mod normalize;
pub mod rehydrate;
pub mod schema;

pub use self::fill::execute_fill;
pub use self::normalize::execute_normalize;
pub use self::rehydrate::execute_rehydrate;
pub use self::schema::execute_schema;
