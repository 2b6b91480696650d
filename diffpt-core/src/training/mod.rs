//! Reflectance recovery: fit the Cornell box's right-wall colour to a rendered target.
//!
//! One step is `zero_grad -> render -> loss -> backward -> step`. The cycle must complete
//! before the next one starts, otherwise gradients from successive renders mix in the
//! same accumulators.

mod error;

pub use error::TrainingError;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::autograd::ScalarNode;
use crate::bsdf::Lobe;
use crate::camera::Camera;
use crate::config::{Config, OptimizerKind};
use crate::image::Image;
use crate::integrator::PathIntegrator;
use crate::optim::{Adam, Optimizer, Sgd};
use crate::scene::cornell::cornell_box;
use crate::scene::Scene;

/// Right-wall reflectance used to render the target image.
pub const TARGET_REFLECTANCE: [f64; 3] = [0.0, 0.0, 0.9];
/// Right-wall reflectance the optimization starts from.
pub const INITIAL_REFLECTANCE: [f64; 3] = [0.0, 0.0, 0.1];

/// Result of one optimization step.
#[derive(Debug)]
pub struct StepOutcome {
    /// Loss of the prediction, before the update.
    pub loss: f64,
    /// The prediction the loss was computed on.
    pub prediction: Image,
}

/// Summary of a full run.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingReport {
    /// Loss per step, in order.
    pub losses: Vec<f64>,
    /// Right-wall reflectance after the last step.
    pub reflectance: [f64; 3],
}

/// Builds the optimizer selected by `config`.
#[must_use]
pub fn build_optimizer(config: &Config) -> Box<dyn Optimizer> {
    match config.optimizer {
        OptimizerKind::Adam => Box::new(
            Adam::new(config.learning_rate)
                .with_betas(config.beta1, config.beta2)
                .with_epsilon(config.epsilon)
                .with_l2(config.l2),
        ),
        OptimizerKind::Sgd => Box::new(
            Sgd::new(config.learning_rate)
                .with_momentum(config.momentum)
                .with_l2(config.l2),
        ),
    }
}

/// Renders a prediction at the target's size, backpropagates its MSE against `target` and
/// updates the optimizer's parameters.
///
/// # Errors
///
/// - [`TrainingError::Render`] if rendering fails.
/// - [`TrainingError::Image`] if the loss cannot be computed.
pub fn optimization_step<R: Rng + ?Sized>(
    optimizer: &mut dyn Optimizer,
    integrator: &PathIntegrator,
    scene: &Scene,
    camera: &Camera,
    target: &Image,
    rng: &mut R,
) -> Result<StepOutcome, TrainingError> {
    optimizer.zero_grad();
    let prediction = integrator.render(scene, camera, target.width(), target.height(), rng)?;
    let loss = prediction.mse_loss(target)?;
    loss.backward();
    optimizer.step();
    Ok(StepOutcome {
        loss: loss.value(),
        prediction,
    })
}

/// Runs the full pipeline described by `config`.
///
/// Renders the target with [`TARGET_REFLECTANCE`] and writes it as `output_0.ppm`, resets
/// the wall to [`INITIAL_REFLECTANCE`], then runs `num_steps` optimization steps, writing
/// `output_<step>.ppm` every `snapshot_every` steps.
///
/// # Errors
///
/// Returns [`TrainingError`] on invalid configuration, render failure or I/O failure.
pub fn run(config: &Config) -> Result<TrainingReport, TrainingError> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir).map_err(|source| TrainingError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let integrator = config.integrator();
    let camera = Camera::default();
    let (scene, right_wall) = cornell_box(TARGET_REFLECTANCE);

    log::info!(
        "rendering {}x{} target at {} spp, depth {}",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth
    );
    let target = integrator
        .render(&scene, &camera, config.width, config.height, &mut rng)?
        .detach();
    target.save_ppm(config.output_dir.join("output_0.ppm"))?;

    let reflectance = right_wall.bsdf(Lobe::Diffuse).weight();
    reflectance.set_values(INITIAL_REFLECTANCE);
    reflectance.requires_grad(true)?;

    let mut optimizer = build_optimizer(config);
    optimizer.add_vec3(reflectance);
    log::info!(
        "optimizing right-wall reflectance with {} (lr {}, l2 {})",
        config.optimizer,
        config.learning_rate,
        config.l2
    );

    let mut losses = Vec::with_capacity(config.num_steps);
    for step in 1..=config.num_steps {
        let outcome = optimization_step(
            optimizer.as_mut(),
            &integrator,
            &scene,
            &camera,
            &target,
            &mut rng,
        )?;
        if step == 1 || step % config.loss_log_every == 0 {
            log::info!(
                "[{step}/{}] loss {:.6} reflectance {reflectance}",
                config.num_steps,
                outcome.loss
            );
        }
        if outcome.loss.is_nan() {
            log::warn!("step {step} produced a NaN loss");
        }
        if config.snapshot_every > 0 && step % config.snapshot_every == 0 {
            outcome
                .prediction
                .save_ppm(config.output_dir.join(format!("output_{step}.ppm")))?;
        }
        losses.push(outcome.loss);
    }

    Ok(TrainingReport {
        losses,
        reflectance: reflectance.values(),
    })
}
