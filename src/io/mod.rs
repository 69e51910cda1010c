pub mod catalog_io;
