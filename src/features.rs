//! Customer feature record and fixed-order encoding

use crate::error::ChurnError;

/// Number of categorical fields in the encoded vector.
pub const CATEGORICAL_FIELDS: usize = 5;

/// Number of numeric fields passed through the scaler.
pub const NUMERIC_FIELDS: usize = 6;

/// Training-time feature order: the categorical block followed by the
/// numeric block. The classifier was fitted on columns in exactly this
/// order, so the concatenation in [`crate::model::predict_churn`] must
/// never deviate from it. The classifier's expected input width is
/// checked against this list when the model context is constructed.
pub const FEATURE_ORDER: [&str; CATEGORICAL_FIELDS + NUMERIC_FIELDS] = [
    "gender",
    "senior_citizen",
    "partner",
    "dependents",
    "payment_method",
    "age",
    "num_dependents",
    "num_referrals",
    "tenure_months",
    "monthly_charge",
    "total_charges",
];

/// Valid ranges for the numeric fields, in [`FEATURE_ORDER`] order.
const NUMERIC_RANGES: [(&str, f64, f64); NUMERIC_FIELDS] = [
    ("age", 18.0, 120.0),
    ("num_dependents", 0.0, 10.0),
    ("num_referrals", 0.0, 50.0),
    ("tenure_months", 0.0, 100.0),
    ("monthly_charge", 0.0, 1000.0),
    ("total_charges", 0.0, 10000.0),
];

/// Raw field values for one customer, as collected from the caller.
///
/// Categorical fields carry the literal strings the training data used;
/// numeric fields are already-typed numbers. A record is built fresh per
/// prediction request and never stored.
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub gender: String,
    pub senior_citizen: String,
    pub partner: String,
    pub dependents: String,
    pub payment_method: String,
    pub age: f64,
    pub num_dependents: f64,
    pub num_referrals: f64,
    pub tenure_months: f64,
    pub monthly_charge: f64,
    pub total_charges: f64,
}

/// Encoded feature vectors prior to scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    /// Categorical lookups as small integers, widened to f64.
    pub categorical: [f64; CATEGORICAL_FIELDS],
    /// Numeric values in training order, unscaled.
    pub numeric: [f64; NUMERIC_FIELDS],
}

impl CustomerRecord {
    /// Encode the record into its categorical and numeric vectors.
    ///
    /// # Returns
    /// * `EncodedRecord` on success
    /// * `ChurnError::UnrecognizedCategory` for a string outside its lookup table
    /// * `ChurnError::ValueOutOfRange` for a numeric field outside its documented range
    pub fn encode(&self) -> Result<EncodedRecord, ChurnError> {
        let categorical = [
            f64::from(encode_gender(&self.gender)?),
            f64::from(encode_yes_no("senior_citizen", &self.senior_citizen)?),
            f64::from(encode_yes_no("partner", &self.partner)?),
            f64::from(encode_yes_no("dependents", &self.dependents)?),
            f64::from(encode_payment_method(&self.payment_method)?),
        ];

        let numeric = [
            self.age,
            self.num_dependents,
            self.num_referrals,
            self.tenure_months,
            self.monthly_charge,
            self.total_charges,
        ];
        for (value, (field, min, max)) in numeric.iter().zip(NUMERIC_RANGES) {
            if !value.is_finite() || *value < min || *value > max {
                return Err(ChurnError::ValueOutOfRange {
                    field,
                    value: *value,
                    min,
                    max,
                });
            }
        }

        Ok(EncodedRecord {
            categorical,
            numeric,
        })
    }
}

/// Gender lookup: Male -> 1, Female -> 0.
fn encode_gender(value: &str) -> Result<u8, ChurnError> {
    match value {
        "Male" => Ok(1),
        "Female" => Ok(0),
        _ => Err(ChurnError::UnrecognizedCategory {
            field: "gender",
            value: value.to_string(),
        }),
    }
}

/// Yes/No lookup shared by the three flag fields: Yes -> 1, No -> 0.
fn encode_yes_no(field: &'static str, value: &str) -> Result<u8, ChurnError> {
    match value {
        "Yes" => Ok(1),
        "No" => Ok(0),
        _ => Err(ChurnError::UnrecognizedCategory {
            field,
            value: value.to_string(),
        }),
    }
}

/// Payment method lookup, matching the training-time label encoding.
fn encode_payment_method(value: &str) -> Result<u8, ChurnError> {
    match value {
        "Electronic check" => Ok(0),
        "Mailed check" => Ok(1),
        "Bank transfer (automatic)" => Ok(2),
        "Credit card (automatic)" => Ok(3),
        _ => Err(ChurnError::UnrecognizedCategory {
            field: "payment_method",
            value: value.to_string(),
        }),
    }
}
