use axum::{
    extract::{Path, Query},
    Json,
};
use tracing::{debug, instrument};

use super::{
    decode, difference, encode,
    types::{DecodedNumber, DifferenceQuery, DifferenceResponse},
};
use crate::shared::AppError;

/// GET /numbers/decode/:text
#[instrument(name = "decode_number")]
pub async fn decode_number(Path(text): Path<String>) -> Result<Json<DecodedNumber>, AppError> {
    let magnitude = decode(&text)?;
    let canonical = encode(&magnitude);
    debug!(%canonical, "Decoded number");

    Ok(Json(DecodedNumber {
        input: text,
        digits: magnitude.to_string(),
        display: canonical,
    }))
}

/// GET /numbers/difference?a=..&b=..
#[instrument(name = "number_difference")]
pub async fn number_difference(
    Query(query): Query<DifferenceQuery>,
) -> Result<Json<DifferenceResponse>, AppError> {
    let result = difference(&query.a, &query.b)?;

    Ok(Json(DifferenceResponse {
        a: query.a,
        b: query.b,
        difference: result,
    }))
}
