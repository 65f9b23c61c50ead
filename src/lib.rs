use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod materials;
pub mod math;
pub mod solver;

// Public re-exports for clean API
pub use config::{DomainConfig, FluidParams, GRAVITY, SphereEmitter};
pub use crate::core::{GridFields, MpmFluidSolver, ParticleSet, SpatialIndex, UniformGrid};
pub use error::{SolverError, SolverResult};
pub use geometry::{BoxObject, ObjectShape, SolidObject, SphereObject};

/// Everything needed to build and drive a solver from a bevy app.
#[derive(Resource, Clone, Debug)]
pub struct FluidSettings {
    pub domain: DomainConfig,
    pub params: FluidParams,
    pub emitters: Vec<SphereEmitter>,
    pub objects: Vec<(String, ObjectShape)>,
    /// Simulated seconds per frame
    pub seconds_per_frame: f32,
    pub substeps: u32,
}

impl Default for FluidSettings {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            params: FluidParams::default(),
            emitters: SphereEmitter::colliding_pair().to_vec(),
            objects: vec![(
                "cube".to_owned(),
                ObjectShape::Box(BoxObject::cube(Vec3::new(0.5, 0.3, 0.5), 0.1)),
            )],
            seconds_per_frame: 1.0 / 60.0,
            substeps: 10,
        }
    }
}

impl FluidSettings {
    /// Construct the solver and register the configured emitters and objects.
    pub fn build_solver(&self) -> SolverResult<MpmFluidSolver> {
        let mut solver = MpmFluidSolver::new(self.domain.clone(), self.params.clone())?;
        for emitter in &self.emitters {
            solver.add_emitter(emitter.clone())?;
        }
        for (name, shape) in &self.objects {
            solver.add_object(name.clone(), shape.clone().into_object());
        }
        Ok(solver)
    }
}

#[derive(Default)]
pub struct MpmFluidPlugin {
    pub settings: FluidSettings,
}

impl Plugin for MpmFluidPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .add_systems(Startup, setup_solver)
            .add_systems(Update, advance_fluid);
    }
}

fn setup_solver(mut commands: Commands, settings: Res<FluidSettings>) {
    match settings.build_solver() {
        Ok(solver) => commands.insert_resource(solver),
        Err(err) => error!("fluid solver not started: {}", err),
    }
}

fn advance_fluid(settings: Res<FluidSettings>, solver: Option<ResMut<MpmFluidSolver>>) {
    if let Some(mut solver) = solver {
        solver.advance_frame(settings.seconds_per_frame, settings.substeps);
    }
}
