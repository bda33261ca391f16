//! Media store implementations.

mod cloudinary;

pub use cloudinary::{CloudinaryConfig, CloudinaryMediaStore};
