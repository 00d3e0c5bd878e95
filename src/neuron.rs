use log::trace;
use rand::Rng;

use crate::{
    axon::{Axon, AxonPhase},
    canvas::{Canvas, Glow, NEURON_FILL, NEURON_GLOW},
    params::{NeuronParams, RenderParams},
    types::{HashMap, NeuronId},
    util::{clamp_unit, jitter_point, Point},
    world::FrameContext,
};

#[derive(Debug, Clone)]
pub struct Neuron {
    id: NeuronId,
    position: Point,
    velocity: Point,
    radius: f64,
    activity: f64,
    axons: Vec<Axon>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeuronUpdateResult {
    pub axons_completed: usize,
    pub axons_retracting: usize,
    pub axons_pruned: usize,
    pub connections_created: usize,
}

/// The other neurons of a world, as seen by the one currently updating.
/// Iteration follows world order with the current neuron left out.
pub struct Peers<'a> {
    before: &'a mut [Neuron],
    after: &'a mut [Neuron],
    index: &'a HashMap<NeuronId, usize>,
}

impl<'a> Peers<'a> {
    /// Splits `neurons` into the neuron at `current` and everything else.
    pub fn split(
        neurons: &'a mut [Neuron],
        current: usize,
        index: &'a HashMap<NeuronId, usize>,
    ) -> Option<(&'a mut Neuron, Peers<'a>)> {
        let (before, rest) = neurons.split_at_mut(current.min(neurons.len()));
        let (neuron, after) = rest.split_first_mut()?;

        Some((
            neuron,
            Peers {
                before,
                after,
                index,
            },
        ))
    }

    /// View over all of `neurons`, for a neuron not (yet) part of them.
    pub fn all(neurons: &'a mut [Neuron], index: &'a HashMap<NeuronId, usize>) -> Self {
        Peers {
            before: neurons,
            after: &mut [],
            index,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neuron> + '_ {
        self.before.iter().chain(self.after.iter())
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NeuronId) -> Option<&Neuron> {
        let idx = *self.index.get(&id)?;
        let split = self.before.len();

        let neuron = if idx < split {
            self.before.get(idx)
        } else if idx > split {
            self.after.get(idx - split - 1)
        } else {
            None
        };

        neuron.filter(|neuron| neuron.id == id)
    }

    pub fn get_mut(&mut self, id: NeuronId) -> Option<&mut Neuron> {
        let idx = *self.index.get(&id)?;
        let split = self.before.len();

        let neuron = if idx < split {
            self.before.get_mut(idx)
        } else if idx > split {
            self.after.get_mut(idx - split - 1)
        } else {
            None
        };

        neuron.filter(|neuron| neuron.id == id)
    }
}

impl Neuron {
    pub fn new<R: Rng>(
        id: NeuronId,
        position: Point,
        neuron_params: &NeuronParams,
        rng: &mut R,
    ) -> Self {
        let radius = neuron_params.min_radius
            + rng.gen::<f64>() * (neuron_params.max_radius - neuron_params.min_radius);

        Self {
            id,
            position,
            velocity: jitter_point(rng, neuron_params.initial_velocity_spread),
            radius,
            activity: 1.0,
            axons: Vec::new(),
        }
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Point) {
        self.velocity = velocity;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn activity(&self) -> f64 {
        self.activity
    }

    pub fn set_activity(&mut self, activity: f64) {
        self.activity = clamp_unit(activity);
    }

    pub fn axons(&self) -> &[Axon] {
        &self.axons
    }

    pub fn has_axon_to(&self, target: NeuronId) -> bool {
        self.axons.iter().any(|axon| axon.target() == target)
    }

    pub fn boost_activity(&mut self, neuron_params: &NeuronParams) {
        self.activity = (self.activity + neuron_params.connection_activity_boost).min(1.0);
    }

    /// Starts at most one new axon toward the first eligible peer, in peer
    /// order. Returns the chosen target.
    pub fn find_potential_connections(
        &mut self,
        peers: &Peers,
        neuron_params: &NeuronParams,
    ) -> Option<NeuronId> {
        if self.axons.len() > neuron_params.max_axons_before_search_stops {
            return None;
        }

        let candidate = peers
            .iter()
            .filter(|peer| peer.id != self.id)
            .filter(|peer| peer.activity >= neuron_params.min_target_activity)
            .find(|peer| {
                let dist = self.position.distance(peer.position);
                dist > neuron_params.min_connection_distance
                    && dist < neuron_params.connection_distance
                    && !self.has_axon_to(peer.id)
            })?;

        let (target, target_position) = (candidate.id, candidate.position);
        self.axons
            .push(Axon::new(self.position, target, target_position));

        Some(target)
    }

    pub fn update<R: Rng>(
        &mut self,
        peers: &mut Peers,
        ctx: &FrameContext,
        rng: &mut R,
    ) -> NeuronUpdateResult {
        let neuron_params = &ctx.params.neuron_params;
        let mut result = NeuronUpdateResult::default();

        self.update_motion(ctx, rng);
        self.update_activity(ctx);

        let num_axons = self.axons.len();
        self.axons
            .retain(|axon| axon.phase() != AxonPhase::FullyRetracted);
        result.axons_pruned = num_axons - self.axons.len();

        for axon in &mut self.axons {
            let target = peers.get_mut(axon.target());

            match axon.update(self.position, target, ctx, rng) {
                Some(AxonPhase::Complete) => {
                    trace!("axon {} -> {} complete", self.id, axon.target());
                    result.axons_completed += 1;
                }
                Some(AxonPhase::Retracting) => {
                    trace!("axon {} -> {} retracting", self.id, axon.target());
                    result.axons_retracting += 1;
                }
                _ => {}
            }
        }

        if rng.gen_bool(neuron_params.connection_search_probability)
            && self
                .find_potential_connections(peers, neuron_params)
                .is_some()
        {
            result.connections_created += 1;
        }

        result
    }

    fn update_motion<R: Rng>(&mut self, ctx: &FrameContext, rng: &mut R) {
        let neuron_params = &ctx.params.neuron_params;

        if rng.gen_bool(neuron_params.velocity_nudge_probability) {
            self.velocity = self.velocity + jitter_point(rng, neuron_params.velocity_nudge_spread);
        }

        self.velocity = self.velocity.clamp_length(neuron_params.max_speed);
        self.position = self.position + self.velocity;

        // bounce only flips the heading; the neuron may sit outside for a frame
        if self.position.x < 0.0 || self.position.x > ctx.width {
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y < 0.0 || self.position.y > ctx.height {
            self.velocity.y = -self.velocity.y;
        }
    }

    fn update_activity(&mut self, ctx: &FrameContext) {
        let neuron_params = &ctx.params.neuron_params;

        if self.position.distance(ctx.mouse) < neuron_params.mouse_influence_radius {
            self.activity = (self.activity + neuron_params.mouse_activity_boost).min(1.0);
        } else {
            self.activity -= neuron_params.activity_decay;
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, render_params: &RenderParams) {
        canvas.fill_circle(
            self.position,
            self.radius,
            NEURON_FILL.with_alpha(self.activity * render_params.neuron_alpha_factor),
            Glow {
                color: NEURON_GLOW.with_alpha(self.activity),
                blur: render_params.glow_blur,
            },
        );
    }
}
