//! Basic usage example for the exdesign library.
//!
//! This example builds a screening design, summarises it, simulates results
//! and analyses them. Set `RUST_LOG=exdesign=debug` to see construction logs.

use exdesign::design::{correlation_matrix, DesignSummary};
use exdesign::doe::{Analyzer, AnovaConfig, MainEffectTable, OnewayAnova};
use exdesign::generate::{Generator, OneHot};
use exdesign::{build_design, DesignBuilder, DesignFamily};
use ndarray::Array2;
use tracing_subscriber::EnvFilter;

fn main() -> exdesign::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("exdesign - Basic Usage Example\n");

    // Definitive screening design for 6 factors (8 with fake factors)
    println!("Building a definitive screening design...");
    let dsd = DesignBuilder::new()
        .family(DesignFamily::DefinitiveScreening)
        .factors(6)
        .fake_factors(2)
        .build()?;

    let summary = DesignSummary::of(&dsd);
    println!("{summary}");
    println!("Design matrix:\n{dsd}\n");

    // Simulated response: factors 0 and 3 matter, the rest is noise
    let res = Array2::from_shape_fn((dsd.nrows(), 1), |(run, _)| {
        let noise = ((run * 7919) % 17) as f64 / 170.0;
        10.0 + 2.0 * f64::from(dsd[[run, 0]]) - 1.5 * f64::from(dsd[[run, 3]]) + noise
    });

    println!("One-way ANOVA per factor:");
    let anova = OnewayAnova::new(AnovaConfig::default()).analyze(&dsd, &res)?;
    println!("  {:<8} {:>4} {:>10} {:>10} {:>10}", "factor", "df", "sum_sq", "F", "PR(>F)");
    for row in anova.table.rows.iter().filter(|r| r.p_value.is_finite()) {
        let flag = if row.p_value < 0.05 { " *" } else { "" };
        println!(
            "  {:<8} {:>4} {:>10.4} {:>10.4} {:>10.4}{flag}",
            row.factor_id, row.df, row.sum_sq, row.f_value, row.p_value
        );
    }
    println!();

    // One-hot design with a negative-control run
    println!("Main effects of a one-hot design...");
    let one_hot = OneHot::new(2)?.with_control_row(true);
    let ex = one_hot.get_exmatrix(&4)?;
    let res = Array2::from_shape_fn((ex.nrows(), 2), |(run, col)| {
        let active = ex.row(run).iter().position(|&v| v == 1).map_or(0.0, |f| f as f64);
        active * (col + 1) as f64
    });
    let met = MainEffectTable::default().analyze(&ex, &res)?;
    println!("Effect matrix (factor x result):\n{}\n", met.effectmatrix);

    println!("Correlation matrix of the one-hot factors:");
    let ex = OneHot::new(1)?.get_exmatrix(&4)?;
    println!("{:.3}\n", correlation_matrix(&ex, 1)?);

    // Parameter-driven construction, as from a prompt
    println!("Plackett-Burman design from string parameters...");
    let pb = build_design("pb", &[("n_factor", "7"), ("n_rep", "1")])?;
    println!("{}", DesignSummary::of(&pb));

    Ok(())
}
