pub mod bulk;
pub mod selection;
