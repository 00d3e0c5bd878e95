pub mod axon;
pub mod canvas;
pub mod driver;
pub mod neuron;
pub mod params;
pub mod state_snapshot;
pub mod svg;
pub mod ticker;
pub mod world;

mod types;
mod util;

pub use types::NeuronId;
pub use util::Point;
