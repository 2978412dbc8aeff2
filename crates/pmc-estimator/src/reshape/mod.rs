//! Distribution reshaper: Beta refit with a bounded CDF-lift fallback.

pub mod lift;
pub mod refit;

use pmc_core::traits::{Refitter, Reshaped};
use pmc_core::types::{
    Baseline, ContextVector, DistributionCurve, MomentAdjustment, ReshapeMethod,
};
use tracing::debug;

use crate::baseline::beta_curves;
use crate::numeric::interpolate;

pub use refit::{refit_parameters, target_moments, TargetMoments};

/// Production [`Refitter`].
#[derive(Debug, Clone, Default)]
pub struct BetaRefitter;

impl BetaRefitter {
    pub fn new() -> Self {
        Self
    }
}

impl Refitter for BetaRefitter {
    fn reshape(
        &self,
        baseline: &Baseline,
        adjustment: &MomentAdjustment,
        context: &ContextVector,
    ) -> Reshaped {
        if adjustment.is_neutral() {
            return pass_through(baseline);
        }

        let refit = refit_parameters(baseline, adjustment);
        let curves = refit.and_then(|shape| {
            beta_curves(&baseline.estimate, &shape, baseline.pdf.len().max(2))
                .map(|(pdf, cdf)| (shape, pdf, cdf))
        });

        match curves {
            Some((shape, pdf, cdf)) => {
                let probability_at_target = read_probability(baseline, &cdf);
                Reshaped {
                    pdf,
                    cdf,
                    method: ReshapeMethod::BetaRefit,
                    refit: Some(shape),
                    probability_at_target,
                }
            }
            None => {
                debug!(
                    mean_shift = adjustment.mean_shift,
                    variance_shrink = adjustment.variance_shrink,
                    "refit infeasible; lifting baseline CDF"
                );
                let gain = lift::lift_gain(context);
                let cdf = lift::lift_cdf(&baseline.cdf, gain);
                let pdf = lift::pdf_from_cdf(&cdf).unwrap_or_else(|| baseline.pdf.clone());
                let probability_at_target = read_probability(baseline, &cdf);
                Reshaped {
                    pdf,
                    cdf,
                    method: ReshapeMethod::CdfLift,
                    refit: None,
                    probability_at_target,
                }
            }
        }
    }
}

/// The baseline, untouched.
pub fn pass_through(baseline: &Baseline) -> Reshaped {
    Reshaped {
        pdf: baseline.pdf.clone(),
        cdf: baseline.cdf.clone(),
        method: ReshapeMethod::PassThrough,
        refit: baseline.shape,
        probability_at_target: baseline.probability_at_target,
    }
}

fn read_probability(baseline: &Baseline, cdf: &DistributionCurve) -> f64 {
    interpolate(cdf, baseline.target).unwrap_or(baseline.probability_at_target)
}
