use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use simple_error::{try_with, SimpleError};

use crate::{
    canvas::{Canvas, BACKGROUND},
    driver::InputEvent,
    neuron::{Neuron, NeuronUpdateResult, Peers},
    params::{self, WorldParams},
    state_snapshot::WorldSnapshot,
    types::{HashMap, NeuronId},
    util::{centered_jitter, Point, ACTIVITY_EPSILON},
};

/// Per-frame view of the world that neurons and axons read while updating.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub mouse: Point,
    pub width: f64,
    pub height: f64,
    pub params: &'a WorldParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub neurons_culled: usize,
    pub axons_completed: usize,
    pub axons_retracting: usize,
    pub axons_pruned: usize,
    pub connections_created: usize,
    pub population: usize,
}

impl FrameStats {
    fn absorb(&mut self, result: &NeuronUpdateResult) {
        self.axons_completed += result.axons_completed;
        self.axons_retracting += result.axons_retracting;
        self.axons_pruned += result.axons_pruned;
        self.connections_created += result.connections_created;
    }
}

pub fn create_world(params: WorldParams) -> Result<World, SimpleError> {
    try_with!(
        params::validate_world_params(&params),
        "invalid world parameters"
    );

    let seed = params
        .technical_params
        .seed_override
        .unwrap_or_else(|| rand::thread_rng().gen());

    debug!(
        "creating world {}x{} with seed {}",
        params.canvas_params.width, params.canvas_params.height, seed
    );

    Ok(World {
        neurons: Vec::with_capacity(params.population_params.max_neurons),
        index: HashMap::default(),
        mouse: Point::new(
            params.canvas_params.width / 2.0,
            params.canvas_params.height / 2.0,
        ),
        width: params.canvas_params.width,
        height: params.canvas_params.height,
        rng: StdRng::seed_from_u64(seed),
        seed,
        next_id: 0,
        frame_count: 0,
        params,
    })
}

pub struct World {
    neurons: Vec<Neuron>,
    index: HashMap<NeuronId, usize>,
    mouse: Point,
    width: f64,
    height: f64,
    rng: StdRng,
    seed: u64,
    next_id: u64,
    frame_count: u64,
    params: WorldParams,
}

impl World {
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn seed_value(&self) -> u64 {
        self.seed
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        let idx = *self.index.get(&id)?;
        self.neurons.get(idx).filter(|neuron| neuron.id() == id)
    }

    pub fn neuron_mut(&mut self, id: NeuronId) -> Option<&mut Neuron> {
        let idx = *self.index.get(&id)?;
        self.neurons.get_mut(idx).filter(|neuron| neuron.id() == id)
    }

    pub fn mouse(&self) -> Point {
        self.mouse
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    /// Adds up to `count` neurons at uniformly random positions. Returns how
    /// many were added before the population cap was hit.
    pub fn seed(&mut self, count: usize) -> usize {
        let mut spawned = 0;

        for _ in 0..count {
            let x = self.rng.gen::<f64>() * self.width;
            let y = self.rng.gen::<f64>() * self.height;

            if self.spawn_neuron(x, y).is_none() {
                break;
            }

            spawned += 1;
        }

        spawned
    }

    /// Adds a neuron at `(x, y)` unless the world is full. The newcomer looks
    /// for a connection among the existing neurons right away.
    pub fn spawn_neuron(&mut self, x: f64, y: f64) -> Option<NeuronId> {
        if self.neurons.len() >= self.params.population_params.max_neurons {
            debug!(
                "population cap of {} reached, not spawning",
                self.params.population_params.max_neurons
            );
            return None;
        }

        let id = NeuronId(self.next_id);
        self.next_id += 1;

        let mut neuron = Neuron::new(
            id,
            Point::new(x, y),
            &self.params.neuron_params,
            &mut self.rng,
        );

        {
            let peers = Peers::all(&mut self.neurons, &self.index);
            neuron.find_potential_connections(&peers, &self.params.neuron_params);
        }

        self.index.insert(id, self.neurons.len());
        self.neurons.push(neuron);

        Some(id)
    }

    pub fn on_click(&mut self, x: f64, y: f64) -> usize {
        let spread = self.params.population_params.click_spawn_spread;
        let mut spawned = 0;

        for _ in 0..self.params.population_params.click_spawn_count {
            let dx = centered_jitter(&mut self.rng, spread);
            let dy = centered_jitter(&mut self.rng, spread);

            if self.spawn_neuron(x + dx, y + dy).is_none() {
                break;
            }

            spawned += 1;
        }

        spawned
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.mouse = Point::new(x, y);
    }

    /// Existing neurons keep their positions and find their way back through
    /// their own bouncing.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Applies one input event. Returns the number of neurons spawned.
    pub fn handle_event(&mut self, event: InputEvent) -> usize {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.on_pointer_move(x, y);
                0
            }
            InputEvent::Click { x, y } => self.on_click(x, y),
            InputEvent::Resize { width, height } => {
                self.on_resize(width, height);
                0
            }
        }
    }

    pub fn find_potential_connections(&mut self, id: NeuronId) -> Option<NeuronId> {
        let current = *self.index.get(&id)?;
        let (neuron, peers) = Peers::split(&mut self.neurons, current, &self.index)?;
        neuron.find_potential_connections(&peers, &self.params.neuron_params)
    }

    /// Drops neurons whose activity has reached the cull threshold.
    pub fn cull(&mut self) -> usize {
        let threshold = self.params.population_params.cull_threshold + ACTIVITY_EPSILON;
        let num_neurons = self.neurons.len();

        self.neurons.retain(|neuron| neuron.activity() > threshold);

        let culled = num_neurons - self.neurons.len();

        if culled > 0 {
            self.rebuild_index();
            debug!("culled {} neurons, {} remain", culled, self.neurons.len());
        }

        culled
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.index.extend(
            self.neurons
                .iter()
                .enumerate()
                .map(|(idx, neuron)| (neuron.id(), idx)),
        );
    }

    /// Culls, then updates every neuron in collection order without drawing.
    pub fn step(&mut self) -> FrameStats {
        let mut stats = FrameStats {
            frame: self.frame_count,
            neurons_culled: self.cull(),
            ..FrameStats::default()
        };

        let ctx = FrameContext {
            mouse: self.mouse,
            width: self.width,
            height: self.height,
            params: &self.params,
        };

        for current in 0..self.neurons.len() {
            if let Some((neuron, mut peers)) = Peers::split(&mut self.neurons, current, &self.index)
            {
                let result = neuron.update(&mut peers, &ctx, &mut self.rng);
                stats.absorb(&result);
            }
        }

        stats.population = self.neurons.len();
        self.frame_count += 1;

        stats
    }

    /// Axons first, neurons on top.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let render_params = &self.params.render_params;

        for neuron in &self.neurons {
            for axon in neuron.axons() {
                let target_activity = self.neuron(axon.target()).map(Neuron::activity);
                axon.draw(canvas, neuron, target_activity, render_params);
            }
        }

        for neuron in &self.neurons {
            neuron.draw(canvas, render_params);
        }
    }

    pub fn frame(&mut self, canvas: &mut dyn Canvas) -> FrameStats {
        canvas.fill_rect(
            Point::default(),
            self.width,
            self.height,
            BACKGROUND.with_alpha(self.params.render_params.trail_alpha),
        );

        let stats = self.step();
        self.draw(canvas);

        stats
    }
}
