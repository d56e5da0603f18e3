//! Token generation from validated schemas.
//!
//! Output depends only on the schema: fields, migrations and units are
//! emitted in declaration order and nothing iterates an unordered map.

pub mod accessor;
pub mod factory;
pub mod migration;
pub mod object;
pub mod unit;

pub use factory::generate_factory;
pub use unit::generate_unit;
