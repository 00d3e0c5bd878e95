use serde::{Deserialize, Serialize};

use crate::{axon::AxonPhase, types::NeuronId, util::Point, world::World};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame: u64,
    pub width: f64,
    pub height: f64,
    pub mouse: Point,
    pub neuron_states: Vec<NeuronState>,
    pub axon_states: Vec<AxonState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronState {
    pub id: NeuronId,
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
    pub activity: f64,
    pub num_axons: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxonState {
    pub source: NeuronId,
    pub target: NeuronId,
    pub target_alive: bool,
    pub phase: AxonPhase,
    pub path_len: usize,
    pub tip: Point,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        let (width, height) = world.dimensions();

        let neuron_states = world
            .neurons()
            .iter()
            .map(|neuron| NeuronState {
                id: neuron.id(),
                position: neuron.position(),
                velocity: neuron.velocity(),
                radius: neuron.radius(),
                activity: neuron.activity(),
                num_axons: neuron.axons().len(),
            })
            .collect();

        let axon_states = world
            .neurons()
            .iter()
            .flat_map(|neuron| {
                neuron.axons().iter().map(move |axon| AxonState {
                    source: neuron.id(),
                    target: axon.target(),
                    target_alive: world.neuron(axon.target()).is_some(),
                    phase: axon.phase(),
                    path_len: axon.path().len(),
                    tip: axon.tip(),
                })
            })
            .collect();

        Self {
            frame: world.frame_count(),
            width,
            height,
            mouse: world.mouse(),
            neuron_states,
            axon_states,
        }
    }
}
