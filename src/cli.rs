//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::context::{MODEL_PATH, SCALER_PATH};
use crate::features::CustomerRecord;

/// Customer churn prediction from pre-fitted scaler and classifier artifacts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the fitted scaler artifact
    #[arg(long, default_value = SCALER_PATH)]
    pub scaler: PathBuf,

    /// Path to the fitted classifier artifact
    #[arg(long, default_value = MODEL_PATH)]
    pub model: PathBuf,

    /// Gender ("Male" or "Female")
    #[arg(long, default_value = "Male")]
    pub gender: String,

    /// Senior citizen ("Yes" or "No")
    #[arg(long, default_value = "No")]
    pub senior_citizen: String,

    /// Has a partner ("Yes" or "No")
    #[arg(long, default_value = "No")]
    pub partner: String,

    /// Has dependents ("Yes" or "No")
    #[arg(long, default_value = "No")]
    pub dependents: String,

    /// Payment method ("Electronic check", "Mailed check",
    /// "Bank transfer (automatic)" or "Credit card (automatic)")
    #[arg(long, default_value = "Electronic check")]
    pub payment_method: String,

    /// Age in years (18-120)
    #[arg(long, default_value_t = 30)]
    pub age: u32,

    /// Number of dependents (0-10)
    #[arg(long, default_value_t = 0)]
    pub num_dependents: u32,

    /// Number of referrals (0-50)
    #[arg(long, default_value_t = 0)]
    pub num_referrals: u32,

    /// Tenure in months (0-100)
    #[arg(long, default_value_t = 12)]
    pub tenure: u32,

    /// Monthly charge in dollars (0-1000)
    #[arg(long, default_value_t = 50.0)]
    pub monthly_charge: f64,

    /// Total charges in dollars (0-10000)
    #[arg(long, default_value_t = 600.0)]
    pub total_charges: f64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Assemble the customer record from the parsed field values.
    pub fn record(&self) -> CustomerRecord {
        CustomerRecord {
            gender: self.gender.clone(),
            senior_citizen: self.senior_citizen.clone(),
            partner: self.partner.clone(),
            dependents: self.dependents.clone(),
            payment_method: self.payment_method.clone(),
            age: f64::from(self.age),
            num_dependents: f64::from(self.num_dependents),
            num_referrals: f64::from(self.num_referrals),
            tenure_months: f64::from(self.tenure),
            monthly_charge: self.monthly_charge,
            total_charges: self.total_charges,
        }
    }
}
