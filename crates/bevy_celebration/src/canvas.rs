use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::sync::{Arc, Mutex, MutexGuard};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::burst::BurstConfig;
use crate::facility::{Facility, ParticleFacility};
use crate::random::{RandomSource, StdRandom};
use crate::shapes::{DrawContext, ShapeCallback};

const FRAME_SECS: f32 = 1.0 / 60.0;
const MAX_FRAME_DELTA: f32 = 0.1;
const CURVE_SEGMENTS: usize = 12;
const ARC_SEGMENTS: usize = 24;
const PARTICLE_SIZE: f32 = 10.0;
const TILT_STEP: f32 = 0.1;

/// Default canvas size when no window is available.
pub const DEFAULT_CANVAS_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

/// The silhouette of one particle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticleShape {
    /// A tilting square, the built-in default.
    Square,
    /// A tilting circle, the built-in default.
    Circle,
    /// A shape registered by name.
    Custom(String),
}

/// A shape callback flattened into closed polylines that fit a unit box
/// centred on the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeOutline {
    /// Every filled contour.
    pub contours: Vec<Vec<Vec2>>,
}

impl ShapeOutline {
    /// Runs `draw` and flattens what it fills.
    pub fn trace(draw: ShapeCallback) -> Self {
        let mut tracer = OutlineTracer::default();
        draw(&mut tracer);
        Self {
            contours: tracer.filled,
        }
        .normalized()
    }

    fn unit_square() -> Self {
        Self {
            contours: vec![vec![
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(-0.5, 0.5),
                Vec2::new(-0.5, -0.5),
            ]],
        }
    }

    fn unit_circle() -> Self {
        let points = (0..=ARC_SEGMENTS)
            .map(|i| Vec2::from_angle(i as f32 / ARC_SEGMENTS as f32 * TAU) * 0.5)
            .collect();
        Self {
            contours: vec![points],
        }
    }

    /// Bounding box of every point, or `None` for an empty outline.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.contours.iter().flatten();
        let first = *points.next()?;
        Some(points.fold(Rect::from_corners(first, first), |rect, point| {
            rect.union_point(*point)
        }))
    }

    fn normalized(mut self) -> Self {
        let Some(bounds) = self.bounds() else {
            return self;
        };
        let extent = bounds.width().max(bounds.height());
        if extent <= f32::EPSILON {
            return self;
        }
        let center = bounds.center();
        for point in self.contours.iter_mut().flatten() {
            *point = (*point - center) / extent;
        }
        self
    }
}

// flattens canvas path calls into polylines. only filled sub-paths are kept.
#[derive(Default)]
struct OutlineTracer {
    current: Vec<Vec2>,
    path: Vec<Vec<Vec2>>,
    filled: Vec<Vec<Vec2>>,
}

impl OutlineTracer {
    fn close_current(&mut self) {
        if self.current.len() > 1 {
            let mut contour = std::mem::take(&mut self.current);
            if let Some(first) = contour.first().copied() {
                contour.push(first);
            }
            self.path.push(contour);
        } else {
            self.current.clear();
        }
    }

    fn push_arc(&mut self, center: Vec2, radii: Vec2, rotation: f32, start: f32, end: f32) {
        let rotation = Rot2::radians(rotation);
        for i in 0..=ARC_SEGMENTS {
            let t = start + (end - start) * i as f32 / ARC_SEGMENTS as f32;
            let local = Vec2::new(t.cos() * radii.x, t.sin() * radii.y);
            self.current.push(center + rotation * local);
        }
    }
}

impl DrawContext for OutlineTracer {
    fn begin_path(&mut self) {
        self.current.clear();
        self.path.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.close_current();
        self.current.push(point);
    }

    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        let start = match self.current.last() {
            Some(point) => *point,
            None => {
                self.current.push(control1);
                control1
            }
        };
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f32 / CURVE_SEGMENTS as f32;
            let u = 1.0 - t;
            let point = start * (u * u * u)
                + control1 * (3.0 * u * u * t)
                + control2 * (3.0 * u * t * t)
                + end * (t * t * t);
            self.current.push(point);
        }
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        self.push_arc(center, Vec2::splat(radius), 0.0, start_angle, end_angle);
    }

    fn ellipse(
        &mut self,
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
    ) {
        self.push_arc(center, radii, rotation, start_angle, end_angle);
    }

    fn fill(&mut self) {
        self.close_current();
        self.filled.extend(self.path.iter().cloned());
    }
}

struct ShapeEntry {
    draw: ShapeCallback,
    outline: ShapeOutline,
}

/// Named shapes known to a [`ConfettiCanvas`].
#[derive(Default)]
pub struct ShapeTable {
    shapes: HashMap<String, ShapeEntry>,
}

impl ShapeTable {
    /// Inserts or replaces `name`.
    pub fn insert(&mut self, name: &str, draw: ShapeCallback) {
        let outline = ShapeOutline::trace(draw);
        self.shapes
            .insert(name.to_string(), ShapeEntry { draw, outline });
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if no shape is registered.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    /// The callback registered under `name`.
    pub fn callback(&self, name: &str) -> Option<ShapeCallback> {
        self.shapes.get(name).map(|entry| entry.draw)
    }

    /// The flattened outline registered under `name`.
    pub fn outline(&self, name: &str) -> Option<&ShapeOutline> {
        self.shapes.get(name).map(|entry| &entry.outline)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shapes.keys().cloned().collect();
        names.sort();
        names
    }
}

/// One live piece of confetti, in canvas pixels (y down).
#[derive(Debug, Clone, PartialEq)]
pub struct Confetto {
    /// Position on the canvas.
    pub position: Vec2,
    /// Current speed, in pixels per frame.
    pub velocity: f32,
    /// Direction of travel, radians.
    pub angle: f32,
    /// Velocity multiplier per frame.
    pub decay: f32,
    /// Sideways push per frame.
    pub drift: f32,
    /// Downward pull per frame.
    pub gravity: f32,
    /// Wobble phase, radians.
    pub wobble: f32,
    /// Wobble phase advance per frame.
    pub wobble_speed: f32,
    /// Tilt phase, radians.
    pub tilt_angle: f32,
    /// Frames lived so far.
    pub tick: u32,
    /// Frames this particle lives in total.
    pub total_ticks: u32,
    /// Base colour.
    pub color: Srgba,
    /// Silhouette.
    pub shape: ParticleShape,
    /// Size multiplier.
    pub scalar: f32,
    /// Stacking order inherited from the burst.
    pub z_index: i32,
}

impl Confetto {
    fn launch(
        burst: &BurstConfig,
        canvas_size: Vec2,
        color: Srgba,
        shape: ParticleShape,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let angle = burst.angle.to_radians();
        let spread = burst.spread.to_radians();
        Self {
            position: burst.origin * canvas_size,
            wobble: rng.next_unit() * 10.0,
            wobble_speed: (rng.next_unit() * 0.1 + 0.05).min(0.11),
            velocity: burst.start_velocity * 0.5 + rng.next_unit() * burst.start_velocity,
            angle: -angle + (0.5 * spread - rng.next_unit() * spread),
            tilt_angle: rng.in_range(0.25, 0.75) * PI,
            decay: burst.decay,
            drift: burst.drift,
            gravity: burst.gravity * 3.0,
            tick: 0,
            total_ticks: burst.ticks,
            color,
            shape,
            scalar: burst.scalar,
            z_index: burst.z_index,
        }
    }

    /// Advances one frame. Returns `false` once the particle has expired.
    pub fn update(&mut self) -> bool {
        self.position.x += self.angle.cos() * self.velocity + self.drift;
        self.position.y += self.angle.sin() * self.velocity + self.gravity;
        self.velocity *= self.decay;
        self.wobble += self.wobble_speed;
        self.tilt_angle += TILT_STEP;
        self.tick += 1;
        self.tick < self.total_ticks
    }

    /// Fraction of the lifetime already spent.
    pub fn progress(&self) -> f32 {
        if self.total_ticks == 0 {
            return 1.0;
        }
        self.tick as f32 / self.total_ticks as f32
    }

    /// Colour with the fade-out applied.
    pub fn faded_color(&self) -> Srgba {
        self.color.with_alpha(1.0 - self.progress())
    }
}

struct CanvasState {
    size: Vec2,
    confetti: Vec<Confetto>,
    shapes: ShapeTable,
    rng: Box<dyn RandomSource>,
}

impl CanvasState {
    fn resolve_shape(&self, name: &str) -> ParticleShape {
        if self.shapes.contains(name) {
            return ParticleShape::Custom(name.to_string());
        }
        match name {
            "circle" => ParticleShape::Circle,
            "square" => ParticleShape::Square,
            _ => {
                trace!("unknown confetti shape \"{name}\", drawing squares");
                ParticleShape::Square
            }
        }
    }

    fn pick_shape(&mut self, burst: &BurstConfig) -> ParticleShape {
        if burst.shapes.is_empty() {
            return if self.rng.next_unit() < 0.5 {
                ParticleShape::Square
            } else {
                ParticleShape::Circle
            };
        }
        let index = (self.rng.next_unit() * burst.shapes.len() as f32) as usize;
        let name = &burst.shapes[index.min(burst.shapes.len() - 1)];
        self.resolve_shape(name)
    }

    fn launch(&mut self, burst: &BurstConfig) {
        let count = burst.whole_particles() as usize;
        self.confetti.reserve(count);
        for i in 0..count {
            let color = burst.colors.cycle(i).unwrap_or(Srgba::WHITE);
            let shape = self.pick_shape(burst);
            let confetto = Confetto::launch(burst, self.size, color, shape, self.rng.as_mut());
            self.confetti.push(confetto);
        }
    }
}

/// A CPU confetti simulation that implements [`ParticleFacility`].
///
/// Clones share the same canvas, so one handle can live in the [`Facility`]
/// resource while another is driven and drawn by the canvas systems.
#[derive(Resource, Clone)]
pub struct ConfettiCanvas {
    state: Arc<Mutex<CanvasState>>,
}

impl ConfettiCanvas {
    /// An empty canvas of `size` pixels.
    pub fn new(size: Vec2) -> Self {
        Self::with_random(size, StdRandom::from_os())
    }

    /// An empty canvas drawing its randomness from `rng`.
    pub fn with_random(size: Vec2, rng: impl RandomSource) -> Self {
        Self {
            state: Arc::new(Mutex::new(CanvasState {
                size,
                confetti: Vec::new(),
                shapes: ShapeTable::default(),
                rng: Box::new(rng),
            })),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, CanvasState>> {
        self.state.lock().ok()
    }

    /// Canvas size, in pixels.
    pub fn size(&self) -> Vec2 {
        self.lock().map(|state| state.size).unwrap_or(DEFAULT_CANVAS_SIZE)
    }

    /// Changes the canvas size. Live particles keep their pixel positions.
    pub fn resize(&self, size: Vec2) {
        if let Some(mut state) = self.lock() {
            state.size = size;
        }
    }

    /// Number of particles still alive.
    pub fn live_particles(&self) -> usize {
        self.lock().map(|state| state.confetti.len()).unwrap_or(0)
    }

    /// A snapshot of the live particles.
    pub fn particles(&self) -> Vec<Confetto> {
        self.lock()
            .map(|state| state.confetti.clone())
            .unwrap_or_default()
    }

    /// Registered shape names, sorted.
    pub fn shape_names(&self) -> Vec<String> {
        self.lock()
            .map(|state| state.shapes.names())
            .unwrap_or_default()
    }

    /// The outline registered under `name`.
    pub fn shape_outline(&self, name: &str) -> Option<ShapeOutline> {
        self.lock()?.shapes.outline(name).cloned()
    }

    /// Advances every particle by one animation frame and drops expired ones.
    pub fn step(&self) {
        if let Some(mut state) = self.lock() {
            state.confetti.retain_mut(Confetto::update);
        }
    }

    /// Removes every live particle.
    pub fn clear(&self) {
        if let Some(mut state) = self.lock() {
            state.confetti.clear();
        }
    }

    fn draw(&self, gizmos: &mut Gizmos) {
        let Some(state) = self.lock() else {
            return;
        };
        let square = ShapeOutline::unit_square();
        let circle = ShapeOutline::unit_circle();
        let half_size = state.size * 0.5;

        for confetto in &state.confetti {
            let outline = match &confetto.shape {
                ParticleShape::Square => &square,
                ParticleShape::Circle => &circle,
                ParticleShape::Custom(name) => state.shapes.outline(name).unwrap_or(&square),
            };

            let size = PARTICLE_SIZE * confetto.scalar;
            let squash = Vec2::new(confetto.tilt_angle.cos().abs().max(0.1), 1.0);
            let rotation = Rot2::radians(confetto.wobble * PI / 10.0);
            let color = confetto.faded_color();

            for contour in &outline.contours {
                let points = contour.iter().map(|point| {
                    let canvas = confetto.position + rotation * (*point * squash * size);
                    Vec2::new(canvas.x - half_size.x, half_size.y - canvas.y)
                });
                gizmos.linestrip_2d(points, color);
            }
        }
    }
}

impl Default for ConfettiCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl ParticleFacility for ConfettiCanvas {
    fn emit(&mut self, burst: &BurstConfig) {
        if let Some(mut state) = self.lock() {
            state.launch(burst);
        }
    }

    fn register_shape(&mut self, name: &str, draw: ShapeCallback) {
        if let Some(mut state) = self.lock() {
            state.shapes.insert(name, draw);
        }
    }
}

/// Installs a [`ConfettiCanvas`] as the particle facility and animates it.
///
/// Particles are drawn with 2D gizmos, so the app needs a 2D camera and the
/// gizmo plugin (both part of `DefaultPlugins` setups). Canvas pixels map to
/// world units with the canvas centred on the origin.
pub struct ConfettiCanvasPlugin {
    /// Initial canvas size. The canvas follows the primary window once one exists.
    pub size: Vec2,
}

impl Default for ConfettiCanvasPlugin {
    fn default() -> Self {
        Self {
            size: DEFAULT_CANVAS_SIZE,
        }
    }
}

impl Plugin for ConfettiCanvasPlugin {
    fn build(&self, app: &mut App) {
        let canvas = ConfettiCanvas::new(self.size);
        app.insert_resource(Facility::new(canvas.clone()))
            .insert_resource(canvas)
            .add_systems(
                Update,
                (fit_canvas_to_window, animate_confetti, draw_confetti).chain(),
            );
    }
}

fn fit_canvas_to_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    canvas: Res<ConfettiCanvas>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if canvas.size() != size {
        canvas.resize(size);
    }
}

fn animate_confetti(time: Res<Time>, canvas: Res<ConfettiCanvas>, mut accumulated: Local<f32>) {
    *accumulated += time.delta_secs().min(MAX_FRAME_DELTA);
    while *accumulated >= FRAME_SECS {
        *accumulated -= FRAME_SECS;
        canvas.step();
    }
}

fn draw_confetti(mut gizmos: Gizmos, canvas: Res<ConfettiCanvas>) {
    canvas.draw(&mut gizmos);
}
