use rayon::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command;
use crate::config::simulation::SimulationConfig;
use crate::dungeon::{print_dungeon_summary, Dungeon};
use crate::entity::catalog;
use crate::util::geometry::Rect;
use crate::world::statistics::compute_statistics;
use crate::world::view::{self, WorldView};
use crate::world::{UpdateStatus, World, WorldEvent};

/// Turns between statistics log lines.
const STATISTICS_INTERVAL: u64 = 100;

/// How the run loop talks to its operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Read console commands from stdin instead of letting the autopilot play.
    pub interactive: bool,
    /// Print every world event as one JSON line.
    pub json_events: bool,
}

/// Build the world and drive it at the configured tick rate until Ctrl-C,
/// the pass limit, or the player's death.
pub async fn run_simulation(
    config: &SimulationConfig,
    zone: Option<&str>,
    options: RunOptions,
) -> Result<(), String> {
    // 1. Build world
    let zone = zone.unwrap_or(config.start_zone.as_str());
    let mut world = World::create(zone, config.seed, config.world_settings())
        .map_err(|e| format!("Failed to create world: {}", e))?;
    let player = world
        .player()
        .ok_or_else(|| "World has no player".to_string())?;

    info!(zone, seed = world.seed, id = %world.id, "World created");

    if !options.interactive && config.autopilot {
        world
            .set_behavior(player, catalog::autopilot())
            .map_err(|e| format!("Failed to start autopilot: {}", e))?;
    }

    // 2. Console input
    let mut input = options.interactive.then(spawn_console_reader);

    // 3. Set up shutdown signal
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let tick_interval = config.tick_interval();
    let mut passes = 0_u64;

    eprintln!(
        "Simulation running in {} (tick rate: {}Hz, {})",
        zone,
        config.tick_rate_hz,
        if options.interactive {
            "interactive"
        } else if config.autopilot {
            "autopilot"
        } else {
            "idle player"
        }
    );
    print_events(&mut world, options.json_events);

    loop {
        let tick_start = std::time::Instant::now();

        if let Some(rx) = input.as_mut() {
            let mut closed = false;
            loop {
                match rx.try_recv() {
                    Ok(line) => submit(&mut world, &line)?,
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        closed = true;
                        break;
                    }
                }
            }
            if closed {
                eprintln!("Console closed");
                input = None;
            }
        } else if world.prompt().is_some() {
            world.resolve_prompt();
        }

        let status = world
            .update()
            .map_err(|e| format!("World error at turn {}: {}", world.turn(), e))?;
        print_events(&mut world, options.json_events);

        if status == UpdateStatus::PassComplete {
            passes += 1;
            if world.turn() % STATISTICS_INTERVAL == 0 {
                let elapsed = tick_start.elapsed().as_secs_f32() * 1000.0;
                let stats = compute_statistics(&world, elapsed);
                info!(
                    turn = stats.turn,
                    creatures = stats.creatures,
                    items_on_ground = stats.items_on_ground,
                    average_health = stats.average_health,
                    "Turn milestone"
                );
            }
        }

        if world.player().is_none() {
            eprintln!("The player has died at turn {}", world.turn());
            break;
        }
        if status == UpdateStatus::Idle {
            warn!(turn = world.turn(), "No creatures left to schedule");
            break;
        }
        if config.max_passes > 0 && passes >= config.max_passes {
            eprintln!("Pass limit of {} reached", config.max_passes);
            break;
        }
        if options.interactive && status == UpdateStatus::AwaitingInput && input.is_none() {
            break;
        }

        // A zone change runs on the very next update.
        let target = if status == UpdateStatus::ZoneChange {
            std::time::Duration::ZERO
        } else {
            tick_interval
        };
        let elapsed = tick_start.elapsed();
        if elapsed < target {
            let sleep_duration = target - elapsed;
            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {}
                _ = &mut shutdown => {
                    eprintln!("\nShutdown signal received");
                    break;
                }
            }
        } else {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    eprintln!("\nShutdown signal received");
                    break;
                }
                _ = tokio::task::yield_now() => {}
            }
        }
    }

    let stats = compute_statistics(&world, 0.0);
    eprintln!(
        "Simulation stopped at turn {} ({} creatures, {} items on the ground)",
        stats.turn, stats.creatures, stats.items_on_ground
    );
    Ok(())
}

/// Forward stdin lines to the run loop so reading never blocks a tick.
fn spawn_console_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Any input dismisses an open prompt. Otherwise the line is a console
/// command whose action, if any, becomes the player's next action.
fn submit(world: &mut World, line: &str) -> Result<(), String> {
    if world.prompt().is_some() {
        world.resolve_prompt();
        return Ok(());
    }
    let action = command::execute(line, world).map_err(|e| format!("Command failed: {}", e))?;
    if let Some(action) = action {
        world.set_player_action(action);
    }
    Ok(())
}

fn print_events(world: &mut World, json: bool) {
    for event in world.drain_events() {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!(error = %e, "Cannot serialize event"),
            }
        } else if let Some(text) = event.display_text() {
            println!("{}", text);
        } else if let WorldEvent::ZoneEntered { zone, seed } = event {
            println!("-- {} (seed {}) --", zone, seed);
        }
    }
}

/// Build a world and print what it looks like before the first turn.
pub fn inspect(config: &SimulationConfig, zone: Option<&str>, json: bool, show_map: bool) -> Result<(), String> {
    let zone = zone.unwrap_or(config.start_zone.as_str());
    let world = World::create(zone, config.seed, config.world_settings())
        .map_err(|e| format!("Failed to create world: {}", e))?;
    let view = WorldView::capture(&world);

    if json {
        let text = serde_json::to_string_pretty(&view).map_err(|e| format!("Cannot serialize view: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== World: {} ===", view.zone.unwrap_or("none"));
    println!("ID: {}", world.id);
    println!("Seed: {}", view.seed);
    println!("Turn: {}", view.turn);
    println!("Items on ground: {}", view.items_on_ground);
    if let Some(cells) = view.visible_cells {
        println!("Visible cells: {}", cells);
    }
    println!();

    println!("--- Creatures ---");
    for c in &view.creatures {
        let marker = if Some(c.id) == view.player { " (player)" } else { "" };
        println!(
            "  #{:<4} {} {:<10} ({:>3}, {:>3})  {:>2}/{:<2} {:?}{}",
            c.id.0, c.glyph, c.name, c.position.x, c.position.y, c.health, c.health_max, c.faction, marker
        );
    }
    println!();

    println!("--- Inventory ---");
    if view.inventory.is_empty() {
        println!("  (none)");
    }
    for item in &view.inventory {
        match item.equipped {
            Some(slot) => println!("  {} ({})", item.name, slot),
            None => println!("  {}", item.name),
        }
    }

    if show_map {
        if let Some(extents) = world.map().extents() {
            println!();
            for row in view::render(&world, extents) {
                println!("{}", row);
            }
        }
    }
    Ok(())
}

/// Room and failure counts over many seeds, generated in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub samples: usize,
    pub regions_min: usize,
    pub regions_max: usize,
    pub regions_mean: f64,
    pub failures_mean: f64,
    pub without_stairs: usize,
}

/// Generate `count` layouts for consecutive seeds starting at `first_seed`.
/// Generation is a pure function of its seed, so the samples run on the
/// rayon pool.
pub fn sample_layouts<F>(first_seed: u64, count: usize, generate: F) -> Option<SampleSummary>
where
    F: Fn(u64) -> Dungeon + Sync,
{
    let results: Vec<(usize, u32, bool)> = (0..count as u64)
        .into_par_iter()
        .map(|i| {
            let dungeon = generate(first_seed.wrapping_add(i).max(1));
            (dungeon.regions.len(), dungeon.failures, dungeon.stairs.is_some())
        })
        .collect();

    let regions_min = results.iter().map(|r| r.0).min()?;
    let regions_max = results.iter().map(|r| r.0).max()?;
    let n = results.len() as f64;
    Some(SampleSummary {
        samples: results.len(),
        regions_min,
        regions_max,
        regions_mean: results.iter().map(|r| r.0 as f64).sum::<f64>() / n,
        failures_mean: results.iter().map(|r| r.1 as f64).sum::<f64>() / n,
        without_stairs: results.iter().filter(|r| !r.2).count(),
    })
}

pub fn print_sample_summary(summary: &SampleSummary) {
    println!("=== Sample Summary ===");
    println!("Samples: {}", summary.samples);
    println!(
        "Regions: min {} / mean {:.1} / max {}",
        summary.regions_min, summary.regions_mean, summary.regions_max
    );
    println!("Rejected placements (mean): {:.1}", summary.failures_mean);
    println!("Layouts without stairs: {}", summary.without_stairs);
}

/// Print a generated layout, optionally with its map. Kept separate from the
/// generators so they stay free of output.
pub fn show_layout(dungeon: &Dungeon, show_map: bool) {
    print_dungeon_summary(dungeon, show_map);
    if let Some(extents) = dungeon.extents() {
        let Rect { width, height, .. } = extents;
        println!("Extents: {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::generation::DungeonParams;
    use crate::dungeon::generate_dungeon;

    #[test]
    fn samples_cover_every_seed() {
        let summary = sample_layouts(10, 8, |seed| {
            generate_dungeon(&DungeonParams {
                seed,
                ..DungeonParams::DEFAULT
            })
        })
        .expect("non-empty sample");
        assert_eq!(summary.samples, 8);
        assert!(summary.regions_min >= 1);
        assert!(summary.regions_min <= summary.regions_max);
        assert!(summary.regions_mean >= summary.regions_min as f64);
    }

    #[test]
    fn samples_are_reproducible() {
        let generate = |seed| {
            generate_dungeon(&DungeonParams {
                seed,
                ..DungeonParams::DEFAULT
            })
        };
        assert_eq!(sample_layouts(3, 5, generate), sample_layouts(3, 5, generate));
    }

    #[test]
    fn no_samples_no_summary() {
        assert!(sample_layouts(1, 0, |_| Dungeon::default()).is_none());
    }

    #[test]
    fn submit_dismisses_prompt_before_commands() {
        let mut world = World::create("glade", 5, Default::default()).unwrap();
        world.show_speech(None, &["Hello."]);
        submit(&mut world, "move north").unwrap();
        assert!(world.prompt().is_none());
        submit(&mut world, "nonsense").unwrap();
        let texts: Vec<String> = world.drain_events().iter().filter_map(|e| e.display_text()).collect();
        assert!(texts.iter().any(|t| t.contains("Unknown command")), "{:?}", texts);
    }
}
