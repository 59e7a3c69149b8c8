pub mod export;
pub mod rect;
pub mod registry;
