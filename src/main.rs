//! ChurnForge: churn prediction CLI over pre-fitted model artifacts
//!
//! This is the main entrypoint that loads the scaler and classifier
//! artifacts, assembles the customer record from the command line, and
//! renders the prediction.

use anyhow::Result;
use churnforge::{predict_churn, Args, ChurnLabel, ModelContext};
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.verbose {
        println!("ChurnForge - Customer Churn Prediction");
        println!("======================================\n");
    }

    run_prediction(&args)
}

/// Load artifacts, run one prediction, and render the result.
fn run_prediction(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    if args.verbose {
        println!("Loading scaler from: {}", args.scaler.display());
        println!("Loading classifier from: {}", args.model.display());
    }

    // An artifact failure here ends the session; no prediction is attempted.
    let load_start = Instant::now();
    let context = ModelContext::load(&args.scaler, &args.model)?;
    let load_time = load_start.elapsed();

    println!("✓ Model artifacts loaded");
    if args.verbose {
        println!("  Loading time: {:.2}s", load_time.as_secs_f64());
        println!(
            "  Classifier: {} trees over {} features",
            context.classifier().trees.len(),
            context.classifier().n_features
        );
    }

    let record = args.record();
    if args.verbose {
        println!("\nCustomer record:");
        println!(
            "  {} / senior: {} / partner: {} / dependents: {}",
            record.gender, record.senior_citizen, record.partner, record.dependents
        );
        println!("  Payment method: {}", record.payment_method);
        println!(
            "  Age {}, {} dependents, {} referrals, tenure {} months",
            record.age, record.num_dependents, record.num_referrals, record.tenure_months
        );
        println!(
            "  Monthly charge ${:.2}, total charges ${:.2}",
            record.monthly_charge, record.total_charges
        );
    }

    let prediction = predict_churn(&context, &record)?;

    println!("\n=== Prediction ===");
    match prediction.label {
        ChurnLabel::Churn => {
            println!("Customer is likely to CHURN");
            println!("  Risk level: HIGH");
            println!(
                "  Churn probability:     {:.1}%",
                prediction.churn_probability * 100.0
            );
        }
        ChurnLabel::Stay => {
            println!("Customer is likely to STAY");
            println!("  Risk level: LOW");
            println!(
                "  Retention probability: {:.1}%",
                prediction.stay_probability() * 100.0
            );
        }
    }
    println!(
        "  Confidence:            {:.1}%",
        prediction.confidence() * 100.0
    );

    if args.verbose {
        println!(
            "\nTotal processing time: {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
