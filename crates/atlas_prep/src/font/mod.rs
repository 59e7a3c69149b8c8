pub mod charmap;
pub mod scan;
pub mod slot;
