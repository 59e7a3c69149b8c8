pub mod colormap;
pub mod isometric;
