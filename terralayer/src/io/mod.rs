//! Persistence and image codecs.
//!
//! Two surfaces: the binary persisted layout ([`save_to`]/[`load_from`]) for
//! whole-terrain round trips, and the image import/export path
//! ([`import_images`]/[`export_image`]) that crosses the codec boundary via
//! the `image` crate.

mod images;
mod layout;

pub use images::{export_image, import_images, layered_to_image};
pub use layout::{load_from, save_to, MAGIC};
