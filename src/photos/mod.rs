pub mod filter;
pub mod metadata;
pub mod naming;
pub mod storage;
pub mod store;

pub use filter::check_image_filename;
pub use metadata::{NewPhoto, PhotoRecord};
pub use naming::{extension_for_mime_type, storage_filename};
pub use storage::LocalFileStorage;
pub use store::{Collection, DocumentStore};
