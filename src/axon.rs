use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    canvas::{Canvas, AXON_STROKE},
    neuron::Neuron,
    params::RenderParams,
    types::NeuronId,
    util::{jitter_point, Point},
    world::FrameContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxonPhase {
    Growing,
    Complete,
    Retracting,
    FullyRetracted,
}

/// Polyline grown from its owning neuron toward `target`. The path always
/// holds at least one point and `path[0]` tracks the live source position.
#[derive(Debug, Clone)]
pub struct Axon {
    target: NeuronId,
    target_anchor: Point,
    path: Vec<Point>,
    phase: AxonPhase,
}

impl Axon {
    pub fn new(source: Point, target: NeuronId, target_position: Point) -> Self {
        Self {
            target,
            target_anchor: target_position,
            path: vec![source],
            phase: AxonPhase::Growing,
        }
    }

    pub fn target(&self) -> NeuronId {
        self.target
    }

    pub fn phase(&self) -> AxonPhase {
        self.phase
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn tip(&self) -> Point {
        self.path[self.path.len() - 1]
    }

    /// Advances the axon by one frame. Returns the new phase if a transition
    /// happened. A `None` target means the target neuron no longer exists; the
    /// axon then keeps heading for the last position it was seen at.
    pub fn update<R: Rng>(
        &mut self,
        source: Point,
        target: Option<&mut Neuron>,
        ctx: &FrameContext,
        rng: &mut R,
    ) -> Option<AxonPhase> {
        self.path[0] = source;

        match self.phase {
            AxonPhase::Retracting => {
                if self.path.len() > 1 {
                    self.path.pop();
                    None
                } else {
                    self.phase = AxonPhase::FullyRetracted;
                    Some(self.phase)
                }
            }
            AxonPhase::Complete | AxonPhase::FullyRetracted => None,
            AxonPhase::Growing => self.grow(target, ctx, rng),
        }
    }

    fn grow<R: Rng>(
        &mut self,
        target: Option<&mut Neuron>,
        ctx: &FrameContext,
        rng: &mut R,
    ) -> Option<AxonPhase> {
        let axon_params = &ctx.params.axon_params;

        if let Some(target) = target.as_deref() {
            self.target_anchor = target.position();
        }

        let tip = self.tip();
        let to_target = self.target_anchor - tip;
        let to_mouse = ctx.mouse - tip;
        let influence = (1.0 - to_mouse.length() / axon_params.mouse_attraction_radius).max(0.0);

        let direction = (to_target + to_mouse * (influence * axon_params.mouse_attraction_weight))
            .with_length(axon_params.growth_speed);

        let new_point = tip + direction + jitter_point(rng, axon_params.jitter_spread);
        self.path.push(new_point);

        if new_point.distance(self.target_anchor) < axon_params.completion_distance {
            self.phase = AxonPhase::Complete;

            if let Some(target) = target {
                target.boost_activity(&ctx.params.neuron_params);
            }

            Some(self.phase)
        } else if self.path.len() > axon_params.max_length {
            self.phase = AxonPhase::Retracting;
            Some(self.phase)
        } else {
            None
        }
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        source: &Neuron,
        target_activity: Option<f64>,
        render_params: &RenderParams,
    ) {
        if self.phase == AxonPhase::FullyRetracted {
            return;
        }

        let mut points = Vec::with_capacity(self.path.len());
        points.push(source.position());
        points.extend_from_slice(&self.path[1..]);

        let alpha =
            render_params.axon_alpha_factor * source.activity().min(target_activity.unwrap_or(1.0));

        canvas.stroke_polyline(
            &points,
            AXON_STROKE.with_alpha(alpha),
            render_params.axon_line_width,
        );
    }
}
