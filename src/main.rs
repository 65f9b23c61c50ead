use bevy::log::LogPlugin;
use bevy::prelude::*;
use mpm_fluid::materials::utils::mean_normal_stress;
use mpm_fluid::{FluidSettings, MpmFluidPlugin, MpmFluidSolver};

const FRAMES: u32 = 120;
const REPORT_EVERY: u32 = 20;

fn report(solver: &MpmFluidSolver) {
    let particles = solver.particles();
    let count = particles.len().max(1) as f32;
    let mean_density = particles.densities().iter().sum::<f32>() / count;
    let mean_pressure = -particles.stresses().iter().map(mean_normal_stress).sum::<f32>() / count;
    let occupied = solver.density_points().count();

    info!(
        "frame {}: {} particles, {} occupied cells, grid mass {:.1} / particle mass {:.1}, mean density {:.3}, mean pressure {:.3}",
        solver.frame(),
        particles.len(),
        occupied,
        solver.total_grid_mass(),
        solver.total_particle_mass(),
        mean_density,
        mean_pressure
    );

    if let Err(err) = solver.check_finite() {
        warn!("simulation unstable: {}", err);
    }
}

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins(MpmFluidPlugin {
            settings: FluidSettings::default(),
        });
    app.finish();
    app.cleanup();

    for frame in 1..=FRAMES {
        app.update();
        if frame % REPORT_EVERY == 0 {
            match app.world().get_resource::<MpmFluidSolver>() {
                Some(solver) => report(solver),
                None => break,
            }
        }
    }
}
