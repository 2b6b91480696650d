// End-to-end reflectance recovery on the Cornell box.
//
// The camera sits inside the box and looks straight at the right wall so every primary
// ray lands on the optimized surface. Only the blue channel of the wall is non-zero.

use diffpt_core::autograd::Vec3;
use diffpt_core::bsdf::Lobe;
use diffpt_core::camera::Camera;
use diffpt_core::integrator::PathIntegrator;
use diffpt_core::optim::{Adam, Optimizer};
use diffpt_core::scene::cornell::cornell_box;
use diffpt_core::training::{optimization_step, INITIAL_REFLECTANCE, TARGET_REFLECTANCE};
use rand::{rngs::StdRng, SeedableRng};

const SIZE: usize = 6;
const STEPS: usize = 20;
const WINDOW: usize = 5;

fn right_wall_camera() -> Camera {
    Camera {
        eye: Vec3::constant(0.0, 0.0, 0.5),
        forward: Vec3::constant(1.0, 0.0, 0.0),
        up: Vec3::constant(0.0, 0.8, 0.0),
        left: Vec3::constant(0.0, 0.0, 0.4),
    }
}

fn window_means(xs: &[f64]) -> Vec<f64> {
    xs.chunks(WINDOW)
        .map(|w| w.iter().sum::<f64>() / w.len() as f64)
        .collect()
}

#[test]
fn adam_recovers_right_wall_reflectance() {
    let mut rng = StdRng::seed_from_u64(7);
    let integrator = PathIntegrator::new(3, 24);
    let camera = right_wall_camera();
    let (scene, right_wall) = cornell_box(TARGET_REFLECTANCE);

    let target = integrator
        .render(&scene, &camera, SIZE, SIZE, &mut rng)
        .unwrap()
        .detach();

    let kd = right_wall.bsdf(Lobe::Diffuse).weight();
    kd.set_values(INITIAL_REFLECTANCE);
    kd.requires_grad(true).unwrap();
    let mut optimizer = Adam::new(0.1).with_l2(0.01);
    optimizer.add_vec3(kd);

    let mut losses = Vec::with_capacity(STEPS);
    let mut blues = Vec::with_capacity(STEPS);
    for _ in 0..STEPS {
        let outcome =
            optimization_step(&mut optimizer, &integrator, &scene, &camera, &target, &mut rng)
                .unwrap();
        assert!(outcome.loss.is_finite());
        losses.push(outcome.loss);
        blues.push(kd.values()[2]);
    }

    let loss_windows = window_means(&losses);
    let first = loss_windows[0];
    let last = loss_windows[loss_windows.len() - 1];
    assert!(first > last, "loss did not decrease: {loss_windows:?}");
    assert!(
        loss_windows.iter().all(|&w| w <= first),
        "a later window exceeds the first: {loss_windows:?}"
    );

    let blue_windows = window_means(&blues);
    assert!(
        blue_windows[blue_windows.len() - 1] > blue_windows[0],
        "reflectance did not grow: {blue_windows:?}"
    );
    let final_blue = blues[STEPS - 1];
    assert!(
        (final_blue - TARGET_REFLECTANCE[2]).abs() < 0.5,
        "final blue {final_blue} far from target"
    );

    // Red and green never leave zero.
    let [r, g, _] = kd.values();
    assert!(r.abs() < 1e-6 && g.abs() < 1e-6, "red {r}, green {g}");
}
