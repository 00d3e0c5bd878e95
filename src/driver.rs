use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::{
    canvas::Canvas,
    ticker::Ticker,
    world::{FrameStats, World},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMove { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
}

pub fn input_channel() -> (Sender<InputEvent>, Receiver<InputEvent>) {
    channel()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: u64,
    pub events_applied: usize,
    pub neurons_spawned: usize,
    pub neurons_culled: usize,
    pub axons_completed: usize,
    pub axons_retracting: usize,
    pub connections_created: usize,
    pub peak_population: usize,
    pub final_population: usize,
}

impl RunSummary {
    fn record(&mut self, stats: &FrameStats) {
        self.frames += 1;
        self.neurons_culled += stats.neurons_culled;
        self.axons_completed += stats.axons_completed;
        self.axons_retracting += stats.axons_retracting;
        self.connections_created += stats.connections_created;
        self.final_population = stats.population;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames: {}", self.frames)?;
        writeln!(f, "events applied: {}", self.events_applied)?;
        writeln!(
            f,
            "neurons: {} spawned, {} culled, peak {}, final {}",
            self.neurons_spawned, self.neurons_culled, self.peak_population, self.final_population
        )?;
        write!(
            f,
            "axons: {} created, {} completed, {} retracting",
            self.connections_created, self.axons_completed, self.axons_retracting
        )
    }
}

/// Runs a world against a tick source. Input events queued on the channel are
/// applied between frames, never during one.
pub struct Driver {
    world: World,
    events: Receiver<InputEvent>,
}

impl Driver {
    pub fn new(world: World, events: Receiver<InputEvent>) -> Self {
        Self { world, events }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn run<T: Ticker>(&mut self, canvas: &mut dyn Canvas, ticker: &mut T) -> RunSummary {
        let mut summary = RunSummary {
            peak_population: self.world.len(),
            final_population: self.world.len(),
            ..RunSummary::default()
        };

        while ticker.wait_tick() {
            self.apply_pending_events(&mut summary);
            summary.peak_population = summary.peak_population.max(self.world.len());

            let stats = self.world.frame(canvas);
            summary.record(&stats);
        }

        summary
    }

    fn apply_pending_events(&mut self, summary: &mut RunSummary) {
        // a disconnected sender just means no more input
        for event in self.events.try_iter() {
            summary.neurons_spawned += self.world.handle_event(event);
            summary.events_applied += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{NullCanvas, RecordingCanvas};
    use crate::params::WorldParams;
    use crate::ticker::CountdownTicker;
    use crate::util::Point;
    use crate::world::create_world;

    fn make_driver(seed: u64) -> (Sender<InputEvent>, Driver) {
        let mut params = WorldParams::default();
        params.technical_params.seed_override = Some(seed);
        let world = create_world(params).unwrap();
        let (tx, rx) = input_channel();
        (tx, Driver::new(world, rx))
    }

    /// Sends a scripted event before every tick.
    struct ScriptedTicker {
        inner: CountdownTicker,
        tx: Sender<InputEvent>,
        script: Vec<InputEvent>,
    }

    impl Ticker for ScriptedTicker {
        fn wait_tick(&mut self) -> bool {
            if !self.inner.wait_tick() {
                return false;
            }

            if !self.script.is_empty() {
                self.tx.send(self.script.remove(0)).unwrap();
            }

            true
        }
    }

    #[test]
    fn runs_all_ticks() {
        let (_tx, mut driver) = make_driver(0);
        driver.world_mut().seed(30);

        let summary = driver.run(&mut NullCanvas, &mut CountdownTicker::new(25));

        assert_eq!(summary.frames, 25);
        assert_eq!(driver.world().frame_count(), 25);
        assert_eq!(summary.peak_population, 30);
        assert_eq!(summary.final_population, driver.world().len());
    }

    #[test]
    fn queued_events_apply_before_next_frame() {
        let (tx, mut driver) = make_driver(1);
        tx.send(InputEvent::PointerMove { x: 5.0, y: 6.0 }).unwrap();
        tx.send(InputEvent::Click { x: 100.0, y: 100.0 }).unwrap();
        tx.send(InputEvent::Resize {
            width: 640.0,
            height: 480.0,
        })
        .unwrap();

        let mut canvas = RecordingCanvas::new();
        let summary = driver.run(&mut canvas, &mut CountdownTicker::new(1));

        assert_eq!(summary.events_applied, 3);
        assert_eq!(summary.neurons_spawned, 5);
        assert_eq!(summary.peak_population, 5);
        assert_eq!(driver.world().mouse(), Point::new(5.0, 6.0));
        assert_eq!(driver.world().dimensions(), (640.0, 480.0));
        assert_eq!(canvas.circles().count(), 5);
    }

    #[test]
    fn scripted_input_between_ticks() {
        let (tx, mut driver) = make_driver(2);
        let mut ticker = ScriptedTicker {
            inner: CountdownTicker::new(4),
            tx,
            script: vec![
                InputEvent::Click { x: 200.0, y: 200.0 },
                InputEvent::PointerMove { x: 210.0, y: 200.0 },
                InputEvent::Click { x: 400.0, y: 200.0 },
            ],
        };

        let summary = driver.run(&mut NullCanvas, &mut ticker);

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.events_applied, 3);
        assert_eq!(summary.neurons_spawned, 10);
        assert_eq!(driver.world().mouse(), Point::new(210.0, 200.0));
    }

    #[test]
    fn dropped_sender_is_not_an_error() {
        let (tx, mut driver) = make_driver(3);
        drop(tx);

        let summary = driver.run(&mut NullCanvas, &mut CountdownTicker::new(3));
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.events_applied, 0);
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            frames: 10,
            neurons_spawned: 5,
            ..RunSummary::default()
        };

        let text = summary.to_string();
        assert!(text.starts_with("frames: 10"));
        assert!(text.contains("5 spawned"));
    }
}
