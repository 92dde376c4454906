// Public API
pub use codec::{decode, decode_with, difference, encode, encode_strict, encode_with, ratio};
pub use errors::NumberError;
pub use magnitude::Magnitude;
pub use suffix::{power_of_thousand, Suffix, SuffixTable};

pub mod handlers;
pub mod types;

// Internal modules
mod codec;
mod errors;
mod magnitude;
mod suffix;
