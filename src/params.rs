use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

pub const MAX_NEURONS: usize = 150;
pub const CONNECTION_DISTANCE: f64 = 150.0;
pub const GROWTH_SPEED: f64 = 0.5;
pub const MOUSE_INFLUENCE_RADIUS: f64 = 250.0;
pub const AXON_MAX_LENGTH: usize = 350;

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub canvas_params: CanvasParams,
    pub population_params: PopulationParams,
    pub neuron_params: NeuronParams,
    pub axon_params: AxonParams,
    pub render_params: RenderParams,
    pub technical_params: TechnicalParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasParams {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    pub max_neurons: usize,
    pub seed_count: usize,
    pub click_spawn_count: usize,
    pub click_spawn_spread: f64,
    pub cull_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuronParams {
    pub min_radius: f64,
    pub max_radius: f64,
    pub initial_velocity_spread: f64,
    pub max_speed: f64,
    pub velocity_nudge_probability: f64,
    pub velocity_nudge_spread: f64,
    pub activity_decay: f64,
    pub mouse_activity_boost: f64,
    pub mouse_influence_radius: f64,
    pub connection_activity_boost: f64,
    pub connection_search_probability: f64,
    pub max_axons_before_search_stops: usize,
    pub min_connection_distance: f64,
    pub connection_distance: f64,
    pub min_target_activity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxonParams {
    pub growth_speed: f64,
    pub jitter_spread: f64,
    pub mouse_attraction_radius: f64,
    pub mouse_attraction_weight: f64,
    pub completion_distance: f64,
    pub max_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    pub trail_alpha: f64,
    pub neuron_alpha_factor: f64,
    pub glow_blur: f64,
    pub axon_alpha_factor: f64,
    pub axon_line_width: f64,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalParams {
    pub seed_override: Option<u64>,
}

impl Default for CanvasParams {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            max_neurons: MAX_NEURONS,
            seed_count: 50,
            click_spawn_count: 5,
            click_spawn_spread: 40.0,
            cull_threshold: 0.01,
        }
    }
}

impl Default for NeuronParams {
    fn default() -> Self {
        Self {
            min_radius: 2.0,
            max_radius: 4.0,
            initial_velocity_spread: 0.2,
            max_speed: 0.2,
            velocity_nudge_probability: 0.01,
            velocity_nudge_spread: 0.1,
            activity_decay: 0.0005,
            mouse_activity_boost: 0.005,
            mouse_influence_radius: MOUSE_INFLUENCE_RADIUS,
            connection_activity_boost: 0.5,
            connection_search_probability: 0.01,
            max_axons_before_search_stops: 3,
            min_connection_distance: 20.0,
            connection_distance: CONNECTION_DISTANCE,
            min_target_activity: 0.5,
        }
    }
}

impl Default for AxonParams {
    fn default() -> Self {
        Self {
            growth_speed: GROWTH_SPEED,
            jitter_spread: 0.8,
            mouse_attraction_radius: 400.0,
            mouse_attraction_weight: 0.5,
            completion_distance: 10.0,
            max_length: AXON_MAX_LENGTH,
        }
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            trail_alpha: 0.1,
            neuron_alpha_factor: 0.8,
            glow_blur: 15.0,
            axon_alpha_factor: 0.3,
            axon_line_width: 0.5,
        }
    }
}

pub fn validate_world_params(world_params: &WorldParams) -> Result<(), SimpleError> {
    validate_canvas_params(&world_params.canvas_params)?;
    validate_population_params(&world_params.population_params)?;
    validate_neuron_params(&world_params.neuron_params)?;
    validate_axon_params(&world_params.axon_params)?;
    validate_render_params(&world_params.render_params)?;

    Ok(())
}

fn validate_canvas_params(canvas_params: &CanvasParams) -> Result<(), SimpleError> {
    if !(canvas_params.width > 0.0) || !(canvas_params.height > 0.0) {
        return Err(SimpleError::new("canvas width and height must be strictly positive"));
    }

    Ok(())
}

fn validate_population_params(population_params: &PopulationParams) -> Result<(), SimpleError> {
    if population_params.max_neurons == 0 {
        return Err(SimpleError::new("max_neurons must be strictly positive"));
    }

    if population_params.click_spawn_spread < 0.0 {
        return Err(SimpleError::new("click_spawn_spread must not be negative"));
    }

    if !(0.0..1.0).contains(&population_params.cull_threshold) {
        return Err(SimpleError::new("cull_threshold must be in [0, 1)"));
    }

    Ok(())
}

fn validate_neuron_params(neuron_params: &NeuronParams) -> Result<(), SimpleError> {
    if neuron_params.min_radius <= 0.0 {
        return Err(SimpleError::new("min_radius must be strictly positive"));
    }

    if neuron_params.min_radius > neuron_params.max_radius {
        return Err(SimpleError::new("min_radius must not be greater than max_radius"));
    }

    if neuron_params.max_speed <= 0.0 {
        return Err(SimpleError::new("max_speed must be strictly positive"));
    }

    if neuron_params.initial_velocity_spread < 0.0 || neuron_params.velocity_nudge_spread < 0.0 {
        return Err(SimpleError::new("velocity spreads must not be negative"));
    }

    validate_probability(
        neuron_params.velocity_nudge_probability,
        "velocity_nudge_probability must be in [0, 1]",
    )?;

    validate_probability(
        neuron_params.connection_search_probability,
        "connection_search_probability must be in [0, 1]",
    )?;

    if neuron_params.activity_decay < 0.0 {
        return Err(SimpleError::new("activity_decay must not be negative"));
    }

    if neuron_params.mouse_activity_boost < 0.0 || neuron_params.connection_activity_boost < 0.0 {
        return Err(SimpleError::new("activity boosts must not be negative"));
    }

    if neuron_params.mouse_influence_radius < 0.0 {
        return Err(SimpleError::new("mouse_influence_radius must not be negative"));
    }

    if neuron_params.min_connection_distance < 0.0 {
        return Err(SimpleError::new("min_connection_distance must not be negative"));
    }

    if neuron_params.min_connection_distance >= neuron_params.connection_distance {
        return Err(SimpleError::new(
            "min_connection_distance must be less than connection_distance",
        ));
    }

    validate_probability(
        neuron_params.min_target_activity,
        "min_target_activity must be in [0, 1]",
    )?;

    Ok(())
}

fn validate_axon_params(axon_params: &AxonParams) -> Result<(), SimpleError> {
    if axon_params.growth_speed <= 0.0 {
        return Err(SimpleError::new("growth_speed must be strictly positive"));
    }

    if axon_params.jitter_spread < 0.0 {
        return Err(SimpleError::new("jitter_spread must not be negative"));
    }

    if axon_params.mouse_attraction_radius <= 0.0 {
        return Err(SimpleError::new(
            "mouse_attraction_radius must be strictly positive",
        ));
    }

    if axon_params.mouse_attraction_weight < 0.0 {
        return Err(SimpleError::new("mouse_attraction_weight must not be negative"));
    }

    if axon_params.completion_distance <= 0.0 {
        return Err(SimpleError::new("completion_distance must be strictly positive"));
    }

    if axon_params.max_length == 0 {
        return Err(SimpleError::new("max_length must be strictly positive"));
    }

    Ok(())
}

fn validate_render_params(render_params: &RenderParams) -> Result<(), SimpleError> {
    validate_probability(render_params.trail_alpha, "trail_alpha must be in [0, 1]")?;
    validate_probability(
        render_params.neuron_alpha_factor,
        "neuron_alpha_factor must be in [0, 1]",
    )?;
    validate_probability(
        render_params.axon_alpha_factor,
        "axon_alpha_factor must be in [0, 1]",
    )?;

    if render_params.glow_blur < 0.0 {
        return Err(SimpleError::new("glow_blur must not be negative"));
    }

    if render_params.axon_line_width <= 0.0 {
        return Err(SimpleError::new("axon_line_width must be strictly positive"));
    }

    Ok(())
}

fn validate_probability(value: f64, message: &str) -> Result<(), SimpleError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimpleError::new(message));
    }

    Ok(())
}
