use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::facility::Facility;

/// Name the heart silhouette is registered under.
pub const HEART: &str = "heart";
/// Name the flower silhouette is registered under.
pub const FLOWER: &str = "flower";

const PETAL_COUNT: usize = 5;
const PETAL_DISTANCE: f32 = 4.0;
const PETAL_RADII: Vec2 = Vec2::new(3.0, 2.0);
const FLOWER_CORE_RADIUS: f32 = 2.0;

/// A 2-D path API, the subset of a canvas context that particle shapes use.
///
/// Coordinates are in particle space: the origin is the particle's centre and
/// one unit is roughly one pixel at scalar `1.0`.
pub trait DrawContext {
    /// Discards the current path and starts a new one.
    fn begin_path(&mut self);
    /// Starts a new sub-path at `point`.
    fn move_to(&mut self, point: Vec2);
    /// Adds a cubic Bézier segment from the current point to `end`.
    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2);
    /// Adds a circular arc, angles in radians.
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32);
    /// Adds an elliptical arc. `rotation` turns the ellipse's x radius, in radians.
    fn ellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
    );
    /// Fills the current path.
    fn fill(&mut self);
}

/// A drawing routine that traces one particle's silhouette.
pub type ShapeCallback = fn(&mut dyn DrawContext);

/// One recorded [`DrawContext`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    /// [`DrawContext::begin_path`].
    BeginPath,
    /// [`DrawContext::move_to`].
    MoveTo(Vec2),
    /// [`DrawContext::bezier_curve_to`].
    BezierCurveTo {
        /// First control point.
        control1: Vec2,
        /// Second control point.
        control2: Vec2,
        /// End point.
        end: Vec2,
    },
    /// [`DrawContext::arc`].
    Arc {
        /// Arc centre.
        center: Vec2,
        /// Arc radius.
        radius: f32,
        /// Start angle, radians.
        start_angle: f32,
        /// End angle, radians.
        end_angle: f32,
    },
    /// [`DrawContext::ellipse`].
    Ellipse {
        /// Ellipse centre.
        center: Vec2,
        /// X and y radii before rotation.
        radii: Vec2,
        /// Rotation, radians.
        rotation: f32,
        /// Start angle, radians.
        start_angle: f32,
        /// End angle, radians.
        end_angle: f32,
    },
    /// [`DrawContext::fill`].
    Fill,
}

/// A [`DrawContext`] that keeps every call it receives, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathRecorder {
    /// The recorded operations.
    pub ops: Vec<PathOp>,
}

impl PathRecorder {
    /// Runs `draw` against a fresh recorder and returns what it traced.
    pub fn record(draw: ShapeCallback) -> Self {
        let mut recorder = Self::default();
        draw(&mut recorder);
        recorder
    }

    /// Replays the recorded operations into another context.
    pub fn replay(&self, context: &mut dyn DrawContext) {
        for op in &self.ops {
            match *op {
                PathOp::BeginPath => context.begin_path(),
                PathOp::MoveTo(point) => context.move_to(point),
                PathOp::BezierCurveTo {
                    control1,
                    control2,
                    end,
                } => context.bezier_curve_to(control1, control2, end),
                PathOp::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => context.arc(center, radius, start_angle, end_angle),
                PathOp::Ellipse {
                    center,
                    radii,
                    rotation,
                    start_angle,
                    end_angle,
                } => context.ellipse(center, radii, rotation, start_angle, end_angle),
                PathOp::Fill => context.fill(),
            }
        }
    }

    /// Number of [`PathOp::Fill`] calls.
    pub fn fill_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == PathOp::Fill).count()
    }
}

impl DrawContext for PathRecorder {
    fn begin_path(&mut self) {
        self.ops.push(PathOp::BeginPath);
    }

    fn move_to(&mut self, point: Vec2) {
        self.ops.push(PathOp::MoveTo(point));
    }

    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        self.ops.push(PathOp::BezierCurveTo {
            control1,
            control2,
            end,
        });
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        self.ops.push(PathOp::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn ellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
    ) {
        self.ops.push(PathOp::Ellipse {
            center,
            radii,
            rotation,
            start_angle,
            end_angle,
        });
    }

    fn fill(&mut self) {
        self.ops.push(PathOp::Fill);
    }
}

/// Traces a heart: four cubic Bézier segments anchored at the origin, then fills.
pub fn heart_shape_draw(context: &mut dyn DrawContext) {
    context.begin_path();
    context.move_to(Vec2::ZERO);
    context.bezier_curve_to(Vec2::new(0.0, -3.0), Vec2::new(5.0, -3.0), Vec2::new(5.0, 0.0));
    context.bezier_curve_to(Vec2::new(5.0, 5.0), Vec2::new(0.0, 10.0), Vec2::new(0.0, 10.0));
    context.bezier_curve_to(Vec2::new(0.0, 10.0), Vec2::new(-5.0, 5.0), Vec2::new(-5.0, 0.0));
    context.bezier_curve_to(Vec2::new(-5.0, -3.0), Vec2::new(0.0, -3.0), Vec2::ZERO);
    context.fill();
}

/// Traces a five petal flower: a filled core circle, then one filled ellipse
/// per petal, each rotated to point away from the centre.
pub fn flower_shape_draw(context: &mut dyn DrawContext) {
    context.begin_path();
    context.arc(Vec2::ZERO, FLOWER_CORE_RADIUS, 0.0, TAU);
    context.fill();

    for i in 0..PETAL_COUNT {
        let angle = i as f32 / PETAL_COUNT as f32 * TAU;
        let center = Vec2::from_angle(angle) * PETAL_DISTANCE;

        context.begin_path();
        context.ellipse(center, PETAL_RADII, angle, 0.0, TAU);
        context.fill();
    }
}

/// Registers the heart and flower shapes with the particle facility.
///
/// Does nothing when no facility is installed. Registering again replaces the
/// previous entries under the same names.
pub fn register_shapes(facility: Option<&mut Facility>) {
    let Some(facility) = facility else {
        debug!("no particle facility installed, skipping shape registration");
        return;
    };

    facility.register_shape(HEART, heart_shape_draw);
    facility.register_shape(FLOWER, flower_shape_draw);
}

pub(crate) fn register_shape_callbacks(mut facility: Option<ResMut<Facility>>) {
    register_shapes(facility.as_deref_mut());
}
