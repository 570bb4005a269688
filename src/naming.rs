//! Centralized column names and presentation labels.
//!
//! Source column names follow the King County sales dataset. Labels are the
//! headers shown in rendered tables and legends.
//!
//! # Categories
//!
//! - **Sale columns**: fields read from the sales CSV (`price`, `zipcode`, ...)
//! - **Derived columns**: fields computed after load (`price_per_area`)
//! - **Result columns**: fixed output schemas of aggregation results
//! - **Labels**: presentation names applied in the overview and region pages

// ============================================================================
// Sale Columns
// ============================================================================

pub const ID: &str = "id";
pub const DATE: &str = "date";
pub const PRICE: &str = "price";
pub const BEDROOMS: &str = "bedrooms";
pub const BATHROOMS: &str = "bathrooms";
pub const SQFT_LIVING: &str = "sqft_living";
pub const SQFT_LOT: &str = "sqft_lot";
pub const FLOORS: &str = "floors";
pub const WATERFRONT: &str = "waterfront";
pub const YR_BUILT: &str = "yr_built";
pub const ZIPCODE: &str = "zipcode";
pub const LAT: &str = "lat";
pub const LONG: &str = "long";

/// Columns every sales table must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    ID,
    DATE,
    PRICE,
    BEDROOMS,
    BATHROOMS,
    SQFT_LIVING,
    SQFT_LOT,
    FLOORS,
    WATERFRONT,
    YR_BUILT,
    ZIPCODE,
    LAT,
    LONG,
];

// ============================================================================
// Derived Columns
// ============================================================================

/// `price / sqft_lot`, null where the lot area is not positive.
pub const PRICE_PER_AREA: &str = "price_per_area";

// ============================================================================
// Result Columns
// ============================================================================

/// Output columns of the descriptive aggregate, in order.
pub const DESCRIBE_COLUMNS: [&str; 6] = ["attributes", "max", "min", "mean", "median", "std"];

pub const BIN_START: &str = "bin_start";
pub const BIN_END: &str = "bin_end";
pub const BIN_COUNT: &str = "count";

// ============================================================================
// Labels
// ============================================================================

pub const LABEL_ZIPCODE: &str = "ZIPCODE";
pub const LABEL_TOTAL_HOUSES: &str = "TOTAL HOUSES";
pub const LABEL_PRICE: &str = "PRICE";
pub const LABEL_SQFT_LIVING: &str = "SQFT LIVING";
pub const LABEL_PRICE_PER_AREA: &str = "PRICE/M2";

/// Key column name of the per-zip price aggregate joined to boundaries.
pub const LABEL_ZIP: &str = "ZIP";

/// Legend title of the price choropleth.
pub const LEGEND_AVG_PRICE: &str = "AVG PRICE";

// ============================================================================
// Boundary Properties
// ============================================================================

/// Default GeoJSON property holding a region's zip code.
pub const BOUNDARY_ZIP_PROPERTY: &str = "ZIP";

/// Normalize a zip code given as text into the shared join key.
///
/// Integral numbers written with a zero fraction (`"98178.0"`) collapse to
/// their integer spelling so CSV floats, GeoJSON numbers and strings agree.
///
/// # Example
/// ```
/// use houselens::naming::zip_key;
/// assert_eq!(zip_key(" 98178 "), Some("98178".to_string()));
/// assert_eq!(zip_key("98178.0"), Some("98178".to_string()));
/// assert_eq!(zip_key(""), None);
/// ```
pub fn zip_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        // Beyond 1e15 an f64 no longer holds every integer exactly
        if value.fract() == 0.0 && value.abs() < 1e15 {
            return Some(format!("{}", value as i64));
        }
    }
    Some(trimmed.to_string())
}

/// Normalize a zip code held in a JSON value (string or number).
pub fn zip_key_from_json(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => zip_key(s),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().and_then(|f| zip_key(&f.to_string()))
            }
        }
        _ => None,
    }
}
