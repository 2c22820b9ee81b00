//! Game World
//!
//! The World is the central container for all simulation state:
//! - Entity allocation and lifetime tracking
//! - Component storage (bodies, character controllers, platforms)
//! - The rider -> platform carry relation
//! - Contact tracking and event publishing
//!
//! One physics tick runs in a fixed order:
//! 1. platforms advance and record how far they moved
//! 2. carried riders move by their carrier's delta
//! 3. characters run gravity, jump rules and horizontal movement
//! 4. dynamic bodies integrate and resolve against the level
//! 5. contact begin / stay / end events go to characters and platforms
//! 6. sound cues raised during the tick are published to `events`

use tracing::info;

use crate::math::Vec2;
use super::audio::{Cue, CueSink, SoundCue};
use super::character::CharacterController;
use super::collision::layers;
use super::component::ComponentStorage;
use super::config::{CharacterConfig, LevelConfig, PlatformConfig, SolidConfig};
use super::entity::{Entity, EntityAllocator};
use super::event::Events;
use super::input::InputSnapshot;
use super::physics::{self, Body, BodyKind, BodyQuery, ContactPhase, ContactTracker};
use super::platform::{CarryEvent, CarryRelation, MovingPlatform};

/// Cue sink that tags every cue with the body raising it.
struct TaggedCues<'a> {
    source: Entity,
    cues: &'a mut Vec<SoundCue>,
}

impl CueSink for TaggedCues<'_> {
    fn cue(&mut self, cue: Cue) {
        self.cues.push(SoundCue { source: self.source, cue });
    }
}

/// The simulation world containing all entities and their components.
#[derive(Debug, Default)]
pub struct World {
    /// Entity allocator for creating/destroying entities
    entities: EntityAllocator,

    /// Colliders, every simulated entity has one
    pub bodies: ComponentStorage<Body>,

    /// Character controllers (player and anything else that walks)
    pub characters: ComponentStorage<CharacterController>,

    /// Moving platforms
    pub platforms: ComponentStorage<MovingPlatform>,

    /// Which platform carries which rider
    pub carry: CarryRelation,

    contacts: ContactTracker,

    /// Published events, cleared by the driver each frame
    pub events: Events,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Spawn an entity with just a collider.
    pub fn spawn_body(&mut self, body: Body) -> Entity {
        let entity = self.entities.allocate();
        self.bodies.insert(entity, body);
        entity
    }

    /// Immediately despawn an entity and forget every relation it was part
    /// of. No end events are raised for its contacts.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.free(entity) {
            return false; // Already dead
        }
        self.bodies.remove(entity);
        self.characters.remove(entity);
        self.platforms.remove(entity);
        self.carry.forget(entity);
        self.contacts.forget(entity);
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    // =========================================================================
    // Convenience Spawners
    // =========================================================================

    /// Static level geometry.
    pub fn spawn_solid(&mut self, config: &SolidConfig) -> Entity {
        self.spawn_body(Body::new(BodyKind::Static, config.center, config.size, config.layer))
    }

    /// A kinematic platform that starts at `config.start`.
    pub fn spawn_platform(&mut self, config: &PlatformConfig) -> Entity {
        let entity = self.spawn_body(Body::new(
            BodyKind::Kinematic,
            config.start,
            config.size,
            layers::PLATFORM,
        ));
        self.platforms.insert(entity, MovingPlatform::from_config(config));
        entity
    }

    /// A dynamic body on the player layer with a character controller.
    pub fn spawn_character(&mut self, position: Vec2, config: CharacterConfig) -> Entity {
        let entity = self.spawn_body(Body::new(BodyKind::Dynamic, position, config.size, layers::PLAYER));
        self.attach_character(entity, config);
        entity
    }

    /// Give an existing body a character controller. The body must exist;
    /// returns false and leaves the world untouched otherwise.
    pub fn attach_character(&mut self, entity: Entity, config: CharacterConfig) -> bool {
        if !self.bodies.contains(entity) {
            return false;
        }
        self.characters.insert(entity, CharacterController::new(config));
        true
    }

    /// Spawn everything a level describes. Returns the player.
    pub fn spawn_level(&mut self, level: &LevelConfig) -> Entity {
        for solid in &level.solids {
            self.spawn_solid(solid);
        }
        for platform in &level.platforms {
            self.spawn_platform(platform);
        }
        let player = self.spawn_character(level.spawn, level.character);
        info!(
            solids = level.solids.len(),
            platforms = level.platforms.len(),
            player = %player,
            "level spawned"
        );
        player
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.bodies.get(entity).map(|b| b.position)
    }

    pub fn velocity(&self, entity: Entity) -> Option<Vec2> {
        self.bodies.get(entity).map(|b| b.velocity)
    }

    pub fn character(&self, entity: Entity) -> Option<&CharacterController> {
        self.characters.get(entity)
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Display-rate update. `input` goes to `player`; other characters see
    /// an idle snapshot but still run their timers.
    pub fn display_tick(&mut self, dt: f32, player: Entity, input: &InputSnapshot) {
        let idle = InputSnapshot::default();
        for (entity, controller) in self.characters.iter_mut() {
            let input = if entity == player { input } else { &idle };
            controller.on_display_tick(dt, input);
        }
    }

    /// One fixed physics step.
    pub fn physics_tick(&mut self, dt: f32) {
        // 1. Platforms
        let mut deltas: Vec<(Entity, Vec2)> = Vec::with_capacity(self.platforms.count());
        for (entity, platform) in self.platforms.iter_mut() {
            let Some(body) = self.bodies.get_mut(entity) else {
                continue;
            };
            let next = platform.on_physics_tick(dt);
            let delta = next - body.position;
            body.position = next;
            body.velocity = if dt > 0.0 { delta * (1.0 / dt) } else { Vec2::ZERO };
            deltas.push((entity, delta));
        }

        // 2. Riders follow their carrier
        for (platform, delta) in deltas {
            for rider in self.carry.riders_of(platform) {
                if let Some(body) = self.bodies.get_mut(rider) {
                    body.position += delta;
                }
            }
        }

        // 3. Characters
        let mut cues: Vec<SoundCue> = Vec::new();
        let mut velocities: Vec<(Entity, Vec2)> = Vec::with_capacity(self.characters.count());
        {
            let query = BodyQuery::new(&self.bodies);
            for (entity, controller) in self.characters.iter_mut() {
                let Some(body) = self.bodies.get(entity) else {
                    continue;
                };
                let mut sink = TaggedCues { source: entity, cues: &mut cues };
                let velocity = controller.on_physics_tick(dt, body.position, body.velocity, &query, &mut sink);
                velocities.push((entity, velocity));
            }
        }
        for (entity, velocity) in velocities {
            if let Some(body) = self.bodies.get_mut(entity) {
                body.velocity = velocity;
            }
        }

        // 4. Integrate
        let pairs = physics::integrate(&mut self.bodies, dt);

        // 5. Contact events
        let contact_events = self.contacts.update(&pairs);
        for event in &contact_events {
            let body = event.body;
            let contact = event.contact;
            let mut sink = TaggedCues { source: body, cues: &mut cues };
            match event.phase {
                ContactPhase::Begin => {
                    if let Some(controller) = self.characters.get_mut(body) {
                        controller.on_collision_begin(&contact, &mut sink);
                    }
                    let other_is_character = self.characters.contains(contact.other);
                    let carries = self
                        .platforms
                        .get(body)
                        .is_some_and(|p| p.on_collision_begin(&contact, other_is_character));
                    if carries {
                        self.carry.attach(contact.other, body);
                        self.events.carry.send(CarryEvent::Attached { rider: contact.other, platform: body });
                    }
                }
                ContactPhase::Stay => {
                    if let Some(controller) = self.characters.get_mut(body) {
                        controller.on_collision_stay(&contact, &mut sink);
                    }
                }
                ContactPhase::End => {
                    if let Some(controller) = self.characters.get_mut(body) {
                        controller.on_collision_end(&contact);
                    }
                    if self.platforms.contains(body) && self.carry.detach(contact.other, body) {
                        self.events.carry.send(CarryEvent::Detached { rider: contact.other, platform: body });
                    }
                }
            }
        }
        self.events.contacts.extend(contact_events);

        // 6. Publish
        self.events.cues.extend(cues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::transition::{Easing, TransitionTiming};

    const DT: f32 = 0.02;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    /// Floor with its top at y = 0
    fn floor() -> SolidConfig {
        SolidConfig::new(Vec2::new(0.0, -0.5), Vec2::new(40.0, 1.0))
    }

    fn frame(world: &mut World, player: Entity, input: InputSnapshot) {
        world.display_tick(DT, player, &input);
        world.physics_tick(DT);
    }

    fn cue_count(world: &World, cue: Cue) -> usize {
        world.events.cues.iter().filter(|c| c.cue == cue).count()
    }

    #[test]
    fn test_spawn_and_despawn() {
        let mut world = World::new();
        let solid = world.spawn_solid(&floor());
        let player = world.spawn_character(Vec2::new(0.0, 0.5), CharacterConfig::default());
        assert_eq!(world.entity_count(), 2);

        assert!(world.despawn(player));
        assert!(!world.despawn(player));
        assert!(!world.is_alive(player));
        assert!(world.character(player).is_none());
        assert!(world.is_alive(solid));
    }

    #[test]
    fn test_attach_character_requires_body() {
        let mut world = World::new();
        let solid = world.spawn_solid(&floor());
        let ghost = world.spawn_body(Body::new(BodyKind::Dynamic, Vec2::new(0.0, 3.0), Vec2::ONE, layers::PLAYER));
        assert!(world.attach_character(ghost, CharacterConfig::default()));

        world.despawn(solid);
        assert!(!world.attach_character(solid, CharacterConfig::default()));
        assert!(!world.characters.contains(solid));
    }

    #[test]
    fn test_character_settles_on_floor() {
        let mut world = World::new();
        world.spawn_solid(&floor());
        let player = world.spawn_character(Vec2::new(0.0, 2.0), CharacterConfig::default());

        let mut lands = 0;
        for _ in 0..100 {
            world.events.clear_all();
            frame(&mut world, player, InputSnapshot::default());
            lands += cue_count(&world, Cue::Land);
        }

        let position = world.position(player).unwrap();
        assert!(approx(position.y, 0.5));
        assert!(world.character(player).unwrap().is_grounded());
        assert_eq!(lands, 1);
    }

    #[test]
    fn test_press_just_before_landing_jumps() {
        let mut world = World::new();
        world.spawn_solid(&floor());
        let config = CharacterConfig::default();
        let player = world.spawn_character(Vec2::new(0.0, 1.5), config);

        let mut pressed_in_air = false;
        let mut jumped = false;
        for _ in 0..100 {
            world.events.clear_all();
            let y = world.position(player).unwrap().y;
            let input = if !pressed_in_air && y < 0.7 {
                pressed_in_air = !world.character(player).unwrap().is_grounded();
                InputSnapshot::jump_press(0.0)
            } else {
                InputSnapshot::jump_hold(0.0)
            };
            frame(&mut world, player, input);

            if cue_count(&world, Cue::Jump { volume: config.jump_volume }) > 0 {
                let state = world.character(player).unwrap().state();
                assert!(state.jumping);
                assert_eq!(state.velocity.y, config.jump.burst_speed);
                jumped = true;
                break;
            }
        }
        assert!(pressed_in_air);
        assert!(jumped);
    }

    #[test]
    fn test_rider_follows_platform_until_contact_ends() {
        let mut world = World::new();
        let platform = world.spawn_platform(&PlatformConfig {
            start: Vec2::ZERO,
            offset: Vec2::new(4.0, 0.0),
            size: Vec2::new(2.0, 0.5),
            timing: TransitionTiming::Duration(1.0),
            easing: Easing::Linear,
        });
        // Platform top at 0.25; drop the rider just onto it
        let player = world.spawn_character(Vec2::new(0.0, 0.76), CharacterConfig::default());

        frame(&mut world, player, InputSnapshot::default());
        assert_eq!(world.carry.carrier_of(player), Some(platform));
        assert_eq!(
            world.events.carry.iter().copied().collect::<Vec<_>>(),
            vec![CarryEvent::Attached { rider: player, platform }]
        );

        // Carried: the rider moves by exactly the platform's delta
        for _ in 0..10 {
            let rider_before = world.position(player).unwrap();
            let platform_before = world.position(platform).unwrap();
            frame(&mut world, player, InputSnapshot::default());
            let rider_delta = world.position(player).unwrap() - rider_before;
            let platform_delta = world.position(platform).unwrap() - platform_before;
            assert!(platform_delta.x > 0.0);
            assert!(approx(rider_delta.x, platform_delta.x));
        }

        // Jump off: contact ends and the relation goes with it
        world.events.clear_all();
        frame(&mut world, player, InputSnapshot::jump_press(0.0));
        assert_eq!(world.carry.carrier_of(player), None);
        assert!(world
            .events
            .carry
            .iter()
            .any(|e| *e == CarryEvent::Detached { rider: player, platform }));

        let x = world.position(player).unwrap().x;
        for _ in 0..5 {
            frame(&mut world, player, InputSnapshot::jump_hold(0.0));
            assert_eq!(world.position(player).unwrap().x, x);
        }
    }

    #[test]
    fn test_side_contact_does_not_carry() {
        let mut world = World::new();
        world.spawn_solid(&floor());
        // Tall platform standing on the floor that barely moves
        let platform = world.spawn_platform(&PlatformConfig {
            start: Vec2::new(2.0, 1.0),
            offset: Vec2::new(0.0, 0.0),
            size: Vec2::new(1.0, 2.0),
            timing: TransitionTiming::Duration(1.0),
            easing: Easing::Linear,
        });
        let player = world.spawn_character(Vec2::new(1.0, 0.5), CharacterConfig::default());

        for _ in 0..30 {
            world.events.clear_all();
            frame(&mut world, player, InputSnapshot::moving(1.0));
        }
        let touching = world.events.contacts.iter().any(|e| {
            e.phase != ContactPhase::End && e.body == player && e.contact.other == platform
        });
        assert!(touching);
        assert_eq!(world.carry.carrier_of(player), None);
    }

    #[test]
    fn test_wall_bump_repeats_no_faster_than_cooldown() {
        let mut world = World::new();
        world.spawn_solid(&floor());
        world.spawn_solid(&SolidConfig::new(Vec2::new(2.0, 2.0), Vec2::new(1.0, 4.0)));
        let config = CharacterConfig::default();
        let player = world.spawn_character(Vec2::new(1.0, 0.5), config);

        let mut bump_ticks = Vec::new();
        for tick in 0..100 {
            world.events.clear_all();
            frame(&mut world, player, InputSnapshot::moving(1.0));
            for _ in 0..cue_count(&world, Cue::WallBump) {
                bump_ticks.push(tick);
            }
        }

        assert!(bump_ticks.len() >= 3);
        for pair in bump_ticks.windows(2) {
            let elapsed = (pair[1] - pair[0]) as f32 * DT;
            assert!(elapsed >= config.wall_bump_repeat_time - 1e-4);
        }
        assert!(!world.character(player).unwrap().state().jumping);
    }

    #[test]
    fn test_wall_retouch_within_cooldown_bumps_once() {
        let mut world = World::new();
        world.spawn_solid(&floor());
        let wall = world.spawn_solid(&SolidConfig::new(Vec2::new(2.0, 2.0), Vec2::new(1.0, 4.0)));
        let config = CharacterConfig::default();
        let player = world.spawn_character(Vec2::new(1.0, 0.5), config);

        let mut wall_begins = Vec::new();
        let mut bump_ticks = Vec::new();
        // Tap into the wall, step back, tap again
        let taps = [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        for (tick, move_axis) in taps.into_iter().enumerate() {
            world.events.clear_all();
            frame(&mut world, player, InputSnapshot::moving(move_axis));
            let touched = world.events.contacts.iter().any(|e| {
                e.phase == ContactPhase::Begin && e.body == player && e.contact.other == wall
            });
            if touched {
                wall_begins.push(tick);
            }
            for _ in 0..cue_count(&world, Cue::WallBump) {
                bump_ticks.push(tick);
            }
        }

        assert_eq!(wall_begins.len(), 2, "expected two separate wall contacts");
        let gap = (wall_begins[1] - wall_begins[0]) as f32 * DT;
        assert!(gap < config.wall_bump_repeat_time);
        assert_eq!(bump_ticks, vec![wall_begins[0]]);
    }

    #[test]
    fn test_despawned_platform_releases_rider() {
        let mut world = World::new();
        let platform = world.spawn_platform(&PlatformConfig {
            start: Vec2::ZERO,
            offset: Vec2::new(0.0, 2.0),
            size: Vec2::new(2.0, 0.5),
            timing: TransitionTiming::Rate(1.0),
            easing: Easing::SmoothStep,
        });
        let player = world.spawn_character(Vec2::new(0.0, 0.76), CharacterConfig::default());
        frame(&mut world, player, InputSnapshot::default());
        assert_eq!(world.carry.carrier_of(player), Some(platform));

        world.despawn(platform);
        assert_eq!(world.carry.carrier_of(player), None);
        frame(&mut world, player, InputSnapshot::default());
        assert!(world.velocity(player).unwrap().y < 0.0);
    }
}
