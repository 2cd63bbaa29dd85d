use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use engine::{LoopConfig, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::audio::{LogBackend, SoundManager};
use crate::sim::config::WorldConfig;
use crate::sim::Simulation;

use super::scene::PlatformerScene;

const SEED_ENV_VAR: &str = "PLATFORMER_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Platformer Startup ===");

    let world = WorldConfig::default();
    let seed = resolve_seed(clock_seed());
    info!(seed, "world_seed_resolved");

    let config = LoopConfig {
        window_title: "Platformer".to_string(),
        window_width: world.screen_width.max(1) as u32,
        window_height: world.screen_height.max(1) as u32,
        ..LoopConfig::default()
    };
    let scene = PlatformerScene::new(
        Simulation::new(world, seed),
        SoundManager::new(Box::new(LogBackend)),
    );

    AppWiring {
        config,
        scene: Box::new(scene),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn resolve_seed(fallback: u64) -> u64 {
    match env::var(SEED_ENV_VAR) {
        Ok(value) => parse_seed(&value).unwrap_or_else(|| {
            warn!(
                env_var = SEED_ENV_VAR,
                value = value.as_str(),
                "invalid seed env var value; falling back to clock seed"
            );
            fallback
        }),
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = SEED_ENV_VAR,
                error = %err,
                "unable to read seed env var; falling back to clock seed"
            );
            fallback
        }
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parses_trimmed_decimal() {
        assert_eq!(parse_seed("42"), Some(42));
        assert_eq!(parse_seed("  7 \n"), Some(7));
    }

    #[test]
    fn malformed_seed_is_rejected() {
        assert_eq!(parse_seed(""), None);
        assert_eq!(parse_seed("-3"), None);
        assert_eq!(parse_seed("0x10"), None);
    }
}
