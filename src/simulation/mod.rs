//! Simulation controller
//!
//! [`SimulationController`] owns the body list, the startup snapshot used by
//! restart, the run state and the UI-facing settings. It drives one frame at a
//! time: an optional physics step, trail recording, then rendering through a
//! [`BatchRenderer`]. Every mutation applies immediately and is also reachable
//! as a [`SimulationCommand`].

pub mod scenario;

use crate::components::{Body, TrailBuffer};
use crate::config::{CameraConfig, PhysicsConfig, RenderingConfig, SimulationConfig};
use crate::events::SimulationCommand;
use crate::physics::forces::{ForceConstants, reference_index};
use crate::physics::integrators::{Integrator, SemiImplicitEuler};
use crate::physics::math::{Scalar, Vector, world_to_screen};
use crate::physics::{self, total_momentum};
use crate::render::{BatchRenderer, CameraView, DeviceError, GraphicsDevice};
use crate::resources::SharedRng;
use crate::states::RunState;
use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::Rng;
use scenario::{SOLAR_MASS, Scenario};

/// Chooses which body a deletion removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySelector {
    /// The first body flagged as reference
    Reference,
    /// A uniformly random non-reference body
    RandomNonReference,
    Index(usize),
}

/// State the settings panel reads and edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Simulated seconds per step
    pub timestep: Scalar,
    pub camera: CameraView,
    pub trails_enabled: bool,
}

impl Settings {
    pub fn zoom(&self) -> f32 {
        self.camera.zoom
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera.offset
    }
}

#[derive(Resource)]
pub struct SimulationController {
    bodies: Vec<Body>,
    snapshot: Vec<Body>,
    settings: Settings,
    state: RunState,
    integrator: Box<dyn Integrator>,
    forces: Vec<Vector>,
    rng: SharedRng,
    constants: ForceConstants,
    physics: PhysicsConfig,
    rendering: RenderingConfig,
    camera: CameraConfig,
    simulated_seconds: Scalar,
    elapsed_seconds: Scalar,
    steps: u64,
}

impl SimulationController {
    pub fn new(scenario: &Scenario, config: &SimulationConfig) -> Self {
        let bodies = scenario.build_bodies(config.rendering.trail_capacity);
        Self::from_bodies(bodies, config)
    }

    /// Builds a controller around an explicit body list, which also becomes
    /// the restart snapshot.
    ///
    /// Rendering values the batch buffers cannot hold are clamped, and trails
    /// longer than a line strip are rebuilt at the clamped capacity.
    pub fn from_bodies(mut bodies: Vec<Body>, config: &SimulationConfig) -> Self {
        let mut rendering = config.rendering.clone();
        rendering.clamp_to_batch_limits();
        for body in &mut bodies {
            if body.trail.capacity() > rendering.max_strip_vertices {
                body.trail = TrailBuffer::new(rendering.trail_capacity);
            }
        }

        let state = if config.physics.start_paused {
            RunState::Paused
        } else {
            RunState::Running
        };

        let mut controller = Self {
            snapshot: bodies.clone(),
            bodies,
            settings: Settings {
                timestep: config.physics.timestep_seconds,
                camera: CameraView::default(),
                trails_enabled: rendering.trails_enabled,
            },
            state,
            integrator: Box::new(SemiImplicitEuler),
            forces: Vec::new(),
            rng: SharedRng::from_optional_seed(config.physics.initial_seed),
            constants: ForceConstants::from(&config.physics),
            physics: config.physics.clone(),
            rendering,
            camera: config.camera.clone(),
            simulated_seconds: 0.0,
            elapsed_seconds: 0.0,
            steps: 0,
        };
        controller.settings = controller.default_settings();
        controller
    }

    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    fn default_settings(&self) -> Settings {
        Settings {
            timestep: self.physics.timestep_seconds.max(self.physics.min_timestep_seconds),
            camera: CameraView::new(Vec2::ZERO, self.camera.default_zoom.max(self.camera.min_zoom)),
            trails_enabled: self.settings.trails_enabled,
        }
    }

    // Frame

    /// Runs one whole frame: physics, trail recording and drawing.
    pub fn frame<D: GraphicsDevice + ?Sized>(
        &mut self,
        wall_dt: Scalar,
        renderer: &mut BatchRenderer,
        device: &mut D,
        viewport: Vec2,
    ) -> Result<(), DeviceError> {
        self.advance(wall_dt);
        self.record_trails();
        self.render(renderer, device, viewport)
    }

    /// Accumulates wall-clock time and, when running, advances the bodies by
    /// one timestep. Returns whether a physics step ran.
    pub fn advance(&mut self, wall_dt: Scalar) -> bool {
        if wall_dt.is_finite() && wall_dt > 0.0 {
            self.elapsed_seconds += wall_dt;
        }

        if self.state.is_paused() {
            return false;
        }

        let dt = self.settings.timestep;
        let frozen = physics::advance(
            &mut self.bodies,
            &mut self.forces,
            self.integrator.as_ref(),
            &self.constants,
            dt,
        );
        if frozen > 0 {
            debug!("{} bodies frozen at step {}", frozen, self.steps);
        }

        self.simulated_seconds += dt;
        self.steps += 1;
        true
    }

    /// Appends each body's current screen position to its trail when trails
    /// are enabled.
    pub fn record_trails(&mut self) {
        if !self.settings.trails_enabled {
            return;
        }

        let scale = self.rendering.meters_to_pixels;
        for body in &mut self.bodies {
            let point = world_to_screen(body.position, scale);
            if point.is_finite() {
                body.trail.push(point);
            }
        }
    }

    /// Uploads the camera and draws every trail, then every body.
    pub fn render<D: GraphicsDevice + ?Sized>(
        &self,
        renderer: &mut BatchRenderer,
        device: &mut D,
        viewport: Vec2,
    ) -> Result<(), DeviceError> {
        device.set_camera(self.settings.camera.matrix(viewport));

        if self.settings.trails_enabled {
            for body in &self.bodies {
                renderer.draw_trail(device, &body.trail, self.rendering.trail_color)?;
            }
        }

        let scale = self.rendering.meters_to_pixels;
        for body in &self.bodies {
            let center = world_to_screen(body.position, scale);
            if !center.is_finite() {
                continue;
            }
            renderer.draw_polygon(
                device,
                center,
                body.visual_radius,
                self.rendering.polygon_sides,
                body.color,
            )?;
        }

        Ok(())
    }

    // Mutations

    /// Sets the step length, never below the configured minimum.
    pub fn set_timestep(&mut self, timestep: Scalar) {
        if !timestep.is_finite() {
            return;
        }
        self.settings.timestep = timestep.max(self.physics.min_timestep_seconds);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state = if paused {
            RunState::Paused
        } else {
            RunState::Running
        };
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.state = self.state.toggled();
        info!("Simulation {:?}", self.state);
        self.state
    }

    pub fn delete_body(&mut self, selector: BodySelector) -> Option<Body> {
        let index = match selector {
            BodySelector::Reference => self.bodies.iter().position(|body| body.is_reference),
            BodySelector::RandomNonReference => {
                let candidates: Vec<usize> = self
                    .bodies
                    .iter()
                    .enumerate()
                    .filter(|(_, body)| !body.is_reference)
                    .map(|(index, _)| index)
                    .collect();
                if candidates.is_empty() {
                    None
                } else {
                    Some(candidates[self.rng.random_range(0..candidates.len())])
                }
            }
            BodySelector::Index(index) => (index < self.bodies.len()).then_some(index),
        }?;

        let removed = self.bodies.remove(index);
        debug!("Deleted {} ({} bodies remain)", removed.name, self.bodies.len());
        Some(removed)
    }

    /// Removes the first body matching `predicate`.
    pub fn delete_first(&mut self, predicate: impl Fn(&Body) -> bool) -> Option<Body> {
        let index = self.bodies.iter().position(predicate)?;
        Some(self.bodies.remove(index))
    }

    /// Restores the startup bodies and default camera and timestep.
    ///
    /// The run state and the trail toggle are left alone.
    pub fn restart(&mut self) {
        self.bodies = self.snapshot.clone();
        self.settings = self.default_settings();
        self.simulated_seconds = 0.0;
        self.steps = 0;
        info!("Simulation restarted with {} bodies", self.bodies.len());
    }

    /// Sets one body's mass. Returns false when `index` is out of range.
    pub fn override_mass(&mut self, index: usize, mass: Scalar) -> bool {
        match self.bodies.get_mut(index) {
            Some(body) => {
                body.mass = mass;
                true
            }
            None => false,
        }
    }

    pub fn override_all_masses(&mut self, mass: Scalar) {
        for body in &mut self.bodies {
            body.mass = mass;
        }
    }

    pub fn zero_all_velocities(&mut self, exclude_reference: bool) {
        for body in &mut self.bodies {
            if exclude_reference && body.is_reference {
                continue;
            }
            body.velocity = Vector::ZERO;
        }
    }

    /// Turning trails on or off starts every trail afresh.
    pub fn set_trails_enabled(&mut self, enabled: bool) {
        if self.settings.trails_enabled != enabled {
            self.clear_trails();
        }
        self.settings.trails_enabled = enabled;
    }

    pub fn toggle_trails(&mut self) -> bool {
        self.set_trails_enabled(!self.settings.trails_enabled);
        self.settings.trails_enabled
    }

    pub fn clear_trails(&mut self) {
        for body in &mut self.bodies {
            body.trail.clear();
        }
    }

    pub fn pan_camera(&mut self, delta: Vec2) {
        self.settings.camera.pan(delta);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.settings.camera.zoom_by(delta, self.camera.min_zoom);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.settings.camera.set_zoom(zoom, self.camera.min_zoom);
    }

    /// Applies a command. Returns false for commands the controller does not
    /// own, such as panel visibility or quitting.
    pub fn apply(&mut self, command: SimulationCommand) -> bool {
        match command {
            SimulationCommand::Restart => self.restart(),
            SimulationCommand::TogglePause => {
                self.toggle_pause();
            }
            SimulationCommand::SetPaused(paused) => self.set_paused(paused),
            SimulationCommand::ToggleTrails => {
                self.toggle_trails();
            }
            SimulationCommand::ClearTrails => self.clear_trails(),
            SimulationCommand::DeleteReferenceBody => {
                self.delete_body(BodySelector::Reference);
            }
            SimulationCommand::DeleteRandomBody => {
                self.delete_body(BodySelector::RandomNonReference);
            }
            SimulationCommand::SetTimestep(timestep) => self.set_timestep(timestep),
            SimulationCommand::ScaleTimestep(factor) => {
                self.set_timestep(self.settings.timestep * factor)
            }
            SimulationCommand::Pan(delta) => self.pan_camera(delta),
            SimulationCommand::Zoom(delta) => self.zoom_by(delta),
            SimulationCommand::SetZoom(zoom) => self.set_zoom(zoom),
            SimulationCommand::OverrideMass { index, mass } => {
                self.override_mass(index, mass);
            }
            SimulationCommand::OverrideAllMasses(mass) => self.override_all_masses(mass),
            SimulationCommand::ZeroVelocities => self.zero_all_velocities(true),
            SimulationCommand::TogglePanel | SimulationCommand::Quit => return false,
        }
        true
    }

    // Accessors

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn snapshot(&self) -> &[Body] {
        &self.snapshot
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn simulated_seconds(&self) -> Scalar {
        self.simulated_seconds
    }

    pub fn elapsed_seconds(&self) -> Scalar {
        self.elapsed_seconds
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Mass of the startup reference body, used by the mass override actions.
    pub fn reference_mass(&self) -> Scalar {
        reference_index(&self.snapshot)
            .map(|index| self.snapshot[index].mass)
            .unwrap_or(SOLAR_MASS)
    }

    pub fn total_momentum(&self) -> Vector {
        total_momentum(&self.bodies)
    }

    pub fn physics_config(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn rendering_config(&self) -> &RenderingConfig {
        &self.rendering
    }

    pub fn camera_config(&self) -> &CameraConfig {
        &self.camera
    }
}
