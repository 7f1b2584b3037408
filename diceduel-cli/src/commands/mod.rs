pub mod play;

pub use play::{handle_host, handle_join};
