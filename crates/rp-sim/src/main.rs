//! Scripted soak harness: run the decision core for N turns on a synthetic
//! level and report what it did. Useful for eyeballing behavior changes and
//! catching panics or stalls without a real host attached.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rp_core::config::PilotConfig;
use rp_core::driver::{run_one_turn, TurnOutcome};
use rp_core::snapshot::terrain::{Feature, Pos};
use rp_core::Action;
use rp_test::{fixtures, GridPath, ScriptedHost};

#[derive(Parser, Debug)]
#[command(name = "rp-sim", about = "Soak the pilot decision core on a synthetic level")]
struct Args {
    /// RNG seed for the unstuck fallback.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Turns to run before giving up.
    #[arg(long, default_value_t = 2_000)]
    turns: usize,

    /// Starting dungeon depth (0 = town).
    #[arg(long, default_value_t = 2)]
    depth: i32,

    /// Optional pilot config file (key = value format).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the engine's diagnostic notes as they accumulate.
    #[arg(long)]
    notes: bool,

    /// Dump the emitted actions as JSON on exit.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let (cfg, warnings) = PilotConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            for warning in warnings {
                eprintln!("config: {warning}");
            }
            cfg
        }
        None => PilotConfig::default(),
    };

    let mut ctx = if args.depth == 0 {
        fixtures::town_context(args.seed)
    } else {
        fixtures::dungeon_context(args.seed, args.depth)
    };
    ctx.config = config;

    // A lit 13x13 room with down stairs in the corner.
    ctx.snapshot.pos = Pos::new(4, 4);
    fixtures::carve_room(&mut ctx, Pos::new(0, 0), Pos::new(12, 12));
    ctx.snapshot
        .level
        .features
        .insert(Pos::new(10, 10), Feature::StairsDown);

    let mut host = ScriptedHost::new();
    let mut path = GridPath;
    let mut bookkeeping = 0usize;

    for turn in 0..args.turns {
        let before = host.actions.len();
        match run_one_turn(&mut ctx, &mut path, &mut host) {
            TurnOutcome::SessionOver => {
                println!("session over after {turn} turns");
                break;
            }
            TurnOutcome::Bookkeeping => bookkeeping += 1,
            TurnOutcome::Acted => {}
        }
        if host.actions.len() > before {
            if let Some(Action::Move(dir)) = host.last() {
                let (dx, dy) = dir.delta();
                ctx.snapshot.pos =
                    Pos::new(ctx.snapshot.pos.x + dx, ctx.snapshot.pos.y + dy);
            }
        }
        if args.notes {
            for note in ctx.notes.drain() {
                println!("[{turn:>5}] {note}");
            }
        }
    }

    println!(
        "emitted {} actions ({} bookkeeping turns), final pos {:?}, power {}",
        host.actions.len(),
        bookkeeping,
        ctx.snapshot.pos,
        ctx.power,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&host.actions)?);
    }
    Ok(())
}
