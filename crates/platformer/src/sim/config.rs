use std::time::Duration;

/// Every tunable gameplay constant. Distances are world pixels, speeds are
/// pixels per tick, and timers run on the simulation clock.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub ground_level: i32,
    pub tile_size: i32,
    pub filler_rows: i32,
    pub gravity: i32,
    pub jump_force: i32,
    pub player_speed: i32,
    pub player_spawn: (i32, i32),
    pub enemy_speed: i32,
    pub power_up_speed: i32,
    pub stomp_tolerance: i32,
    pub starting_lives: u32,
    pub camera_lead_margin: i32,
    pub cull_margin: i32,
    /// Generation runs when the horizon is closer than this to the camera.
    pub generation_trigger_distance: i32,
    pub segment_width: i32,
    pub initial_ground_first_tile: i32,
    pub initial_horizon: i32,
    pub gap_chance_percent: u32,
    /// Tiles at the start of every segment that are always solid ground.
    pub gap_free_lead_tiles: i32,
    pub respawn_min_x: i32,
    pub respawn_offset_x: i32,
    pub respawn_height_above_ground: i32,
    pub combo_timeout: Duration,
    pub damage_invincibility: Duration,
    pub respawn_invincibility: Duration,
    pub stomp_shake: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            ground_level: 500,
            tile_size: 32,
            filler_rows: 3,
            gravity: 1,
            jump_force: -20,
            player_speed: 5,
            player_spawn: (100, 450),
            enemy_speed: 2,
            power_up_speed: 2,
            stomp_tolerance: 15,
            starting_lives: 3,
            camera_lead_margin: 300,
            cull_margin: 300,
            generation_trigger_distance: 1200,
            segment_width: 1600,
            initial_ground_first_tile: -20,
            initial_horizon: 1600,
            gap_chance_percent: 10,
            gap_free_lead_tiles: 4,
            respawn_min_x: 100,
            respawn_offset_x: 100,
            respawn_height_above_ground: 100,
            combo_timeout: Duration::from_secs(2),
            damage_invincibility: Duration::from_secs(2),
            respawn_invincibility: Duration::from_secs(3),
            stomp_shake: 5,
        }
    }
}

impl WorldConfig {
    pub fn stomp_bounce(&self) -> i32 {
        self.jump_force / 2
    }

    pub fn ground_tile_index(&self, x: i32) -> i32 {
        x.div_euclid(self.tile_size)
    }
}
