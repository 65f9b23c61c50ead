use std::ops::Range;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{DomainConfig, FluidParams, SphereEmitter};
use crate::error::{SolverError, SolverResult};
use crate::geometry::{ObjectSet, SolidObject};
use crate::materials::{pressure, utils::check};
use crate::math::{Matrix, Real};
use crate::solver::{self, WallConditions};

use super::grid::UniformGrid;
use super::grid_fields::GridFields;
use super::particle_set::{ParticleSet, SpatialIndex};

/// Aggregate simulation state for the fluid solver.
#[derive(Resource)]
pub struct MpmFluidSolver {
    grid: UniformGrid,
    fields: GridFields,
    particles: ParticleSet,
    index: SpatialIndex,
    params: FluidParams,
    walls: WallConditions,
    emitters: Vec<SphereEmitter>,
    objects: ObjectSet,
    rng: StdRng,
    frame: u64,
}

impl MpmFluidSolver {
    /// Allocate grid fields and particle storage for `domain`.
    pub fn new(domain: DomainConfig, params: FluidParams) -> SolverResult<Self> {
        domain.validate()?;
        params.validate()?;

        let grid = UniformGrid::new(&domain);
        info!(
            "mpm fluid: {} cells ({}x{}x{}), spacing {}, ghost width {}, capacity {}",
            grid.cell_count(),
            grid.resolution().x,
            grid.resolution().y,
            grid.resolution().z,
            grid.spacing(),
            grid.ghost_width(),
            domain.particle_capacity
        );

        Ok(Self {
            fields: GridFields::new(&grid),
            particles: ParticleSet::with_capacity(domain.particle_capacity),
            index: SpatialIndex::new(grid.cell_count()),
            walls: WallConditions::new(&grid),
            rng: StdRng::seed_from_u64(params.seed),
            grid,
            params,
            emitters: Vec::new(),
            objects: ObjectSet::new(),
            frame: 0,
        })
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn fields(&self) -> &GridFields {
        &self.fields
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    pub fn walls(&self) -> &WallConditions {
        &self.walls
    }

    pub fn emitters(&self) -> &[SphereEmitter] {
        &self.emitters
    }

    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    /// Frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Register an emitter fired at the start of every frame. The sphere must
    /// lie inside the walls.
    pub fn add_emitter(&mut self, emitter: SphereEmitter) -> SolverResult<()> {
        if !(emitter.radius.is_finite() && emitter.radius > 0.0) {
            return Err(SolverError::InvalidParameter {
                name: "radius",
                value: emitter.radius,
            });
        }
        if !self.walls.contains_sphere(emitter.center, emitter.radius) {
            return Err(SolverError::EmitterOutsideDomain {
                center: emitter.center,
                radius: emitter.radius,
            });
        }
        self.emitters.push(emitter);
        Ok(())
    }

    pub fn add_object(&mut self, name: impl Into<String>, object: Box<dyn SolidObject>) {
        self.objects.insert(name, object);
    }

    pub fn remove_object(&mut self, name: &str) -> SolverResult<Box<dyn SolidObject>> {
        self.objects.remove(name)
    }

    /// Append one particle. The spatial index is rebuilt before the next
    /// transfer.
    pub fn add_particle(&mut self, position: Vec3, velocity: Vec3) -> usize {
        self.particles.add_particle(position, velocity)
    }

    /// Advance one frame: emit, rebuild, then run `steps` substeps of
    /// `spf / steps` seconds each.
    pub fn advance_frame(&mut self, spf: Real, steps: u32) {
        self.source_particles();
        self.rebuild_spatial_index();

        if steps == 0 {
            warn!("advance_frame called with zero substeps; only emitting");
        } else {
            let dt = spf / steps as Real;
            debug!(
                "frame {}: {} particles, {} substeps of {:.5}s",
                self.frame,
                self.particles.len(),
                steps,
                dt
            );
            for _ in 0..steps {
                self.substep(dt);
            }
        }

        self.frame += 1;
    }

    /// One pass of the full transfer/compute/update/advect cycle.
    pub fn substep(&mut self, dt: Real) {
        self.rasterize();
        self.reconstruct_density();
        self.compute_stress_tensors();
        self.compute_grid_forces();
        self.update_velocities(dt);
        self.advect_particles(dt);
        self.couple_with_objects();
        self.rebuild_spatial_index();
    }

    /// Particles appended since the last rebuild are not binned yet.
    fn ensure_index(&mut self) {
        if self.index.len() != self.particles.len() {
            self.rebuild_spatial_index();
        }
    }

    pub fn rasterize(&mut self) {
        self.ensure_index();
        solver::rasterize(
            &self.grid,
            &self.index,
            &self.particles,
            self.params.mass,
            &mut self.fields,
        );
    }

    pub fn reconstruct_density(&mut self) {
        self.ensure_index();
        solver::reconstruct_density(
            &self.grid,
            &self.index,
            &mut self.particles,
            &self.fields,
            self.params.smoothing,
        );
    }

    pub fn compute_stress_tensors(&mut self) {
        self.ensure_index();
        solver::compute_stress_tensors(
            &self.grid,
            &self.index,
            &mut self.particles,
            &self.fields.velocity,
            &self.params,
        );
    }

    pub fn compute_grid_forces(&mut self) {
        self.ensure_index();
        solver::compute_grid_forces(
            &self.grid,
            &self.index,
            &self.particles,
            &self.params,
            &mut self.fields,
        );
    }

    /// Grid velocity update followed by the gather back to particles.
    pub fn update_velocities(&mut self, dt: Real) {
        self.ensure_index();
        solver::update_grid_velocities(&mut self.fields, self.grid.cell_volume(), dt);
        solver::gather_grid_velocities(
            &self.grid,
            &self.index,
            &mut self.particles,
            &self.fields.updated_velocity,
        );
    }

    pub fn advect_particles(&mut self, dt: Real) {
        solver::advect_particles(&mut self.particles, dt);
    }

    pub fn couple_with_objects(&mut self) {
        solver::couple_with_objects(
            &mut self.particles,
            &self.objects,
            &self.walls,
            self.params.mass,
            self.params.contact_stiffness,
        );
    }

    pub fn rebuild_spatial_index(&mut self) {
        let clamped = self.index.rebuild(&self.grid, &self.particles.positions);
        if clamped > 0 {
            warn!(
                "{} particles left the wall margin and were clamped into the stencil-safe region",
                clamped
            );
        }
    }

    /// Fire every registered emitter once. Returns the number of new particles.
    pub fn source_particles(&mut self) -> usize {
        let start = self.particles.len();
        for emitter in &self.emitters {
            if let Err(err) = solver::source_from_sphere(
                &mut self.particles,
                &mut self.rng,
                emitter.center,
                emitter.velocity,
                emitter.radius,
                emitter.count,
            ) {
                warn!("skipping emitter: {}", err);
            }
        }
        let emitted = self.particles.len() - start;
        if emitted > 0 {
            info!("emitted {} particles ({} total)", emitted, self.particles.len());
        }
        emitted
    }

    /// Emit `count` particles inside a sphere, moving at `velocity`.
    pub fn source_from_sphere(
        &mut self,
        center: Vec3,
        velocity: Vec3,
        radius: Real,
        count: usize,
    ) -> SolverResult<Range<usize>> {
        solver::source_from_sphere(
            &mut self.particles,
            &mut self.rng,
            center,
            velocity,
            radius,
            count,
        )
    }

    /// Equation of state with this solver's parameters.
    pub fn pressure(&self, density: Real) -> Real {
        pressure(density, self.params.rest_density, self.params.stiffness)
    }

    /// Strain rate at an arbitrary position from the current rasterized grid
    /// velocity.
    pub fn strain_rate_at(&self, position: Vec3) -> Matrix {
        let (cell, _) = self.grid.containing_cell(position);
        solver::strain_rate(&self.grid, &self.fields.velocity, cell, position)
    }

    /// `(cell_center, density)` for every cell holding fluid.
    pub fn density_points(&self) -> impl Iterator<Item = (Vec3, Real)> + '_ {
        self.fields.density_points(&self.grid)
    }

    pub fn total_grid_mass(&self) -> Real {
        self.fields.total_mass(self.grid.cell_volume())
    }

    pub fn total_particle_mass(&self) -> Real {
        self.params.mass * self.particles.len() as Real
    }

    /// First particle holding a NaN/Inf (or negative density) value, if any.
    pub fn check_finite(&self) -> SolverResult<()> {
        let particles = &self.particles;
        for index in 0..particles.len() {
            let attribute = if !check::vector_ok(particles.positions[index]) {
                "position"
            } else if !check::vector_ok(particles.velocities[index]) {
                "velocity"
            } else if !check::density_ok(particles.densities[index]) {
                "density"
            } else if !check::stress_ok(&particles.stresses[index]) {
                "stress"
            } else {
                continue;
            };
            return Err(SolverError::NonFiniteParticle { index, attribute });
        }
        Ok(())
    }
}
