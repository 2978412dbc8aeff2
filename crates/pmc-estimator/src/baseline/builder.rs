//! `BaselineProvider` implementation covering all three baseline modes.

use pmc_core::config::BaselineConfig;
use pmc_core::errors::InputError;
use pmc_core::traits::{BaselineProvider, BaselineRequest};
use pmc_core::types::{
    Baseline, BaselineMode, DistributionCurve, RefitParameters, ThreePointEstimate,
};
use tracing::debug;

use super::pert::{beta_curves, canonical_shape, cdf_from_pdf};
use super::{smoothing, triangular};
use crate::numeric::{interpolate, trapezoid, Mulberry32};

/// Fewest Monte Carlo draws accepted by the sampling modes.
pub const MIN_SAMPLE_COUNT: usize = 100;

/// Builds baselines from three-point estimates.
#[derive(Debug, Clone)]
pub struct PertBaselineProvider {
    mode: BaselineMode,
    grid_points: usize,
    smoothing_weight: f64,
    seed: u64,
}

impl PertBaselineProvider {
    pub fn new(mode: BaselineMode) -> Self {
        Self::from_config(&BaselineConfig {
            mode: Some(mode),
            ..Default::default()
        })
    }

    pub fn from_config(config: &BaselineConfig) -> Self {
        Self {
            mode: config.effective_mode(),
            grid_points: config.effective_grid_points(),
            smoothing_weight: config.effective_smoothing_weight(),
            seed: config.effective_seed(),
        }
    }

    pub fn mode(&self) -> BaselineMode {
        self.mode
    }

    fn validate(&self, request: &BaselineRequest) -> Result<(), InputError> {
        request.estimate.validate()?;
        if !request.target.is_finite() {
            return Err(InputError::NonFinite { field: "target" });
        }
        if !(request.confidence_level > 0.0 && request.confidence_level < 1.0) {
            return Err(InputError::InvalidConfidenceLevel {
                value: request.confidence_level,
            });
        }
        if self.mode != BaselineMode::Pert && request.sample_count < MIN_SAMPLE_COUNT {
            return Err(InputError::InvalidSampleCount {
                value: request.sample_count,
                min: MIN_SAMPLE_COUNT,
            });
        }
        Ok(())
    }

    fn build_beta(&self, request: &BaselineRequest) -> Result<Baseline, InputError> {
        let estimate = request.estimate;
        let shape = canonical_shape(&estimate).ok_or(InputError::ZeroRange {
            value: estimate.optimistic,
        })?;
        let (mut pdf, mut cdf) = beta_curves(&estimate, &shape, self.grid_points)
            .ok_or(InputError::ZeroRange {
                value: estimate.optimistic,
            })?;

        if self.mode == BaselineMode::PertSmoothed {
            if let Some((smoothed_pdf, smoothed_cdf)) = self.smooth(&estimate, &shape, &pdf, request) {
                pdf = smoothed_pdf;
                cdf = smoothed_cdf;
            } else {
                debug!("degenerate Monte Carlo sample; keeping analytic PERT grid");
            }
        }

        let mean = estimate.pert_mean();
        let variance = pdf_variance(&pdf, mean);
        Ok(derive(
            estimate,
            self.mode,
            request.target,
            pdf,
            cdf,
            Some(shape),
            mean,
            variance,
            None,
            None,
        ))
    }

    fn smooth(
        &self,
        estimate: &ThreePointEstimate,
        shape: &RefitParameters,
        pdf: &DistributionCurve,
        request: &BaselineRequest,
    ) -> Option<(DistributionCurve, DistributionCurve)> {
        let mut rng = Mulberry32::from_seed(self.seed);
        let samples = smoothing::draw_beta_samples(estimate, shape, request.sample_count, &mut rng);
        let xs = pdf.xs();
        let kde = smoothing::kde_on_grid(&samples, &xs)?;
        let mixed = smoothing::mix(&xs, &pdf.ys(), &kde, self.smoothing_weight)?;
        let cdf = cdf_from_pdf(&xs, &mixed)?;
        Some((DistributionCurve::from_xy(&xs, &mixed), cdf))
    }

    fn build_triangular(&self, request: &BaselineRequest) -> Result<Baseline, InputError> {
        let estimate = request.estimate;
        let mut rng = Mulberry32::from_seed(self.seed);
        let sorted = triangular::sample_sorted(&estimate, request.sample_count, &mut rng);
        let pdf = triangular::histogram_pdf(&estimate, &sorted).ok_or(InputError::ZeroRange {
            value: estimate.optimistic,
        })?;
        let cdf = triangular::empirical_cdf(&estimate, &sorted);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        Ok(derive(
            estimate,
            self.mode,
            request.target,
            pdf,
            cdf,
            None,
            mean,
            variance,
            triangular::confidence_interval(&sorted, request.confidence_level),
            triangular::empirical_probability(&sorted, request.target),
        ))
    }
}

impl Default for PertBaselineProvider {
    fn default() -> Self {
        Self::from_config(&BaselineConfig::default())
    }
}

impl BaselineProvider for PertBaselineProvider {
    fn build(&self, request: &BaselineRequest) -> Result<Baseline, InputError> {
        self.validate(request)?;
        let baseline = match self.mode {
            BaselineMode::Pert | BaselineMode::PertSmoothed => self.build_beta(request)?,
            BaselineMode::TriangularMonteCarlo => self.build_triangular(request)?,
        };
        debug!(
            mode = baseline.mode.name(),
            points = baseline.pdf.len(),
            mean = baseline.mean,
            p0 = baseline.probability_at_target,
            "baseline built"
        );
        Ok(baseline)
    }
}

/// `∫ (x − mean)² f(x) dx` over the sampled PDF.
fn pdf_variance(pdf: &DistributionCurve, mean: f64) -> f64 {
    let xs = pdf.xs();
    let weighted: Vec<f64> = pdf
        .points()
        .iter()
        .map(|p| (p.x - mean).powi(2) * p.y)
        .collect();
    trapezoid(&xs, &weighted).max(0.0)
}

#[allow(clippy::too_many_arguments)]
fn derive(
    estimate: ThreePointEstimate,
    mode: BaselineMode,
    target: f64,
    pdf: DistributionCurve,
    cdf: DistributionCurve,
    shape: Option<RefitParameters>,
    mean: f64,
    variance: f64,
    confidence_interval: Option<(f64, f64)>,
    empirical_probability: Option<f64>,
) -> Baseline {
    let std_dev = variance.sqrt();
    let coefficient_of_variation = estimate.range() / mean.abs().max(1e-9);
    let skew = if std_dev > 0.0 {
        (mean - target) / std_dev
    } else {
        0.0
    };
    let probability_at_target = interpolate(&cdf, target).unwrap_or(0.0);

    Baseline {
        estimate,
        mode,
        target,
        pdf,
        cdf,
        shape,
        pert_mean: estimate.pert_mean(),
        mean,
        variance,
        std_dev,
        coefficient_of_variation,
        skew,
        probability_at_target,
        confidence_interval,
        empirical_probability,
    }
}
