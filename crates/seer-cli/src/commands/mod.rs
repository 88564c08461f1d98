pub mod apply;
pub mod reconcile;
pub mod schema;
pub mod shared;
pub mod transform;
