//! Debug renderer
//!
//! Flat rectangles for every body and a text HUD. World space is y-up in
//! world units; the view follows the player horizontally.

use macroquad::prelude::*;
use platformer2d::game::physics::{Body, BodyKind};
use platformer2d::game::{JumpPhase, Simulation};
use platformer2d::math::Vec2 as WorldVec;

const PIXELS_PER_UNIT: f32 = 40.0;

const SKY: Color = Color::new(0.08, 0.09, 0.14, 1.0);
const SOLID: Color = Color::new(0.35, 0.37, 0.45, 1.0);
const PLATFORM: Color = Color::new(0.85, 0.55, 0.2, 1.0);
const CARRIED: Color = Color::new(0.35, 0.85, 0.55, 1.0);
const PATH: Color = Color::new(0.85, 0.55, 0.2, 0.35);

/// World to screen mapping for one frame.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub focus: WorldVec,
    pub screen: (f32, f32),
}

impl View {
    pub fn following(focus: WorldVec) -> Self {
        Self { focus, screen: (screen_width(), screen_height()) }
    }

    pub fn to_screen(&self, p: WorldVec) -> (f32, f32) {
        let (w, h) = self.screen;
        let x = w * 0.5 + (p.x - self.focus.x) * PIXELS_PER_UNIT;
        // Keep the ground line in the lower part of the screen
        let y = h * 0.75 - p.y * PIXELS_PER_UNIT;
        (x, y)
    }
}

fn phase_color(phase: JumpPhase) -> Color {
    match phase {
        JumpPhase::GroundedIdle => Color::new(0.3, 0.6, 1.0, 1.0),
        JumpPhase::Rising => Color::new(1.0, 0.9, 0.3, 1.0),
        JumpPhase::Cut => Color::new(1.0, 0.45, 0.35, 1.0),
        JumpPhase::AirborneUnjumped => Color::new(0.75, 0.5, 1.0, 1.0),
    }
}

fn draw_body(view: &View, body: &Body, color: Color) {
    let top_left = WorldVec::new(body.position.x - body.half_extents.x, body.position.y + body.half_extents.y);
    let (x, y) = view.to_screen(top_left);
    let size = body.size();
    draw_rectangle(x, y, size.x * PIXELS_PER_UNIT, size.y * PIXELS_PER_UNIT, color);
}

/// Draw the world as seen from the player.
pub fn draw_world(sim: &Simulation) {
    clear_background(SKY);
    let world = &sim.world;
    let player = sim.player();
    let view = View::following(world.position(player).unwrap_or(WorldVec::ZERO));

    // Platform paths under everything else
    for (_, platform) in world.platforms.iter() {
        let (from, to) = platform.waypoints();
        let (x1, y1) = view.to_screen(from);
        let (x2, y2) = view.to_screen(to);
        draw_line(x1, y1, x2, y2, 1.0, PATH);
    }

    for (entity, body) in world.bodies.iter() {
        let color = match body.kind {
            BodyKind::Static => SOLID,
            BodyKind::Kinematic if !world.carry.riders_of(entity).is_empty() => CARRIED,
            BodyKind::Kinematic => PLATFORM,
            BodyKind::Dynamic => world
                .character(entity)
                .map(|c| phase_color(c.state().phase))
                .unwrap_or(WHITE),
        };
        draw_body(&view, body, color);
    }
}

/// What the HUD shows besides simulation state
pub struct HudInfo<'a> {
    pub display_rate: &'a str,
    pub steps_this_frame: u32,
    pub has_gamepad: bool,
}

pub fn draw_hud(sim: &Simulation, info: &HudInfo) {
    let world = &sim.world;
    let player = sim.player();
    let mut lines = vec![
        format!("display {}  fps {}  physics {} Hz  steps {}", info.display_rate, get_fps(), sim.level().physics_hz, info.steps_this_frame),
    ];
    if let Some(c) = world.character(player) {
        let state = c.state();
        lines.push(format!(
            "phase {:<9} grounded {:<5} vel ({:6.2}, {:6.2})",
            state.phase.label(),
            state.grounded,
            state.velocity.x,
            state.velocity.y
        ));
        lines.push(format!(
            "buffer {:5.2}  wall cd {:5.2}  jump vol {:4.2}",
            state.early_jump_timer.max(0.0),
            state.wall_bump_timer.max(0.0),
            c.jump_volume()
        ));
    }
    let carrier = world
        .carry
        .carrier_of(player)
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("carried by {}  bodies {}", carrier, world.entity_count()));
    if !sim.playing {
        lines.push("PAUSED  (N / B: step)".to_string());
    }
    lines.push(format!(
        "move A/D  jump Space  pause P  reset R  rate F  hud H{}",
        if info.has_gamepad { "  [gamepad]" } else { "" }
    ));

    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 12.0, 22.0 + i as f32 * 20.0, 20.0, WHITE);
    }
}
