pub mod module_visitor;
pub mod strip;
