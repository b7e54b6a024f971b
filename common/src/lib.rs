pub mod file_format;
pub mod fnv;
pub mod log_setup;
pub mod serde;
pub mod test_utils;

pub use file_format::{get_file_extension, FileExtensionError, SerdeFormat};
pub use fnv::{hash_hex, FnvHasher};
pub use log_setup::setup_logging;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
