use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct DecodedNumber {
    pub input: String,
    /// Exact integer as decimal digits
    pub digits: String,
    /// Canonical suffixed form
    pub display: String,
}

#[derive(Debug, Deserialize)]
pub struct DifferenceQuery {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DifferenceResponse {
    pub a: String,
    pub b: String,
    pub difference: String,
}
