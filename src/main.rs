use std::time::{Duration, Instant};

use hebbnet::driver::TickDriver;
use hebbnet::graph::Position;
use hebbnet::network::Network;
use hebbnet::observer::Diagnostics;
use hebbnet::world::{World, WorldConfig};

const DEFAULT_STEPS: u64 = 2_000;
const DEFAULT_HIDDEN: usize = 4;
const PERIOD: Duration = Duration::from_millis(100);

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }

    let steps = parse_or_exit(args.get(1), DEFAULT_STEPS, "steps");
    let hidden = parse_or_exit(args.get(2), DEFAULT_HIDDEN, "hidden");
    let seed = parse_or_exit(args.get(3), 1u64, "seed");

    let mut net = Network::new();
    for i in 0..hidden {
        let pos = Position::new(250.0, 80.0 + i as f32 * 50.0);
        if let Err(e) = net.add_hidden_default(pos) {
            eprintln!("could not add hidden neuron: {e}");
            std::process::exit(1);
        }
    }

    let mut world = World::new(WorldConfig {
        seed,
        ..WorldConfig::default()
    });
    let mut driver = TickDriver::new(PERIOD);
    driver.start();

    // Simulated clock: every tick sees exactly one period elapse, so runs
    // are reproducible for a given seed.
    let t0 = Instant::now();
    let report_every = (steps / 10).max(1);
    for step in 0..steps {
        let now = t0 + PERIOD * step as u32;
        let Some(report) = driver.tick(&mut net, &mut world, now) else {
            break;
        };
        if report.tick % report_every == 0 {
            let d = Diagnostics::capture(&net);
            let stats = world.stats();
            println!(
                "tick {:>6} action={:<5} collected={:>4} mean_w={:.3} mean_hidden={:.3} out=[{:.2} {:.2} {:.2} {:.2}]",
                report.tick,
                report.action.as_str(),
                stats.collected,
                d.mean_weight,
                d.mean_hidden_activity,
                d.outputs[0],
                d.outputs[1],
                d.outputs[2],
                d.outputs[3],
            );
        }
    }
    driver.stop();

    let stats = world.stats();
    println!(
        "\nDone: {} steps, {} rewards collected ({:.2} per 100 steps)",
        stats.steps,
        stats.collected,
        if stats.steps == 0 {
            0.0
        } else {
            stats.collected as f64 * 100.0 / stats.steps as f64
        }
    );
}

fn parse_or_exit<T: std::str::FromStr>(arg: Option<&String>, default: T, what: &str) -> T {
    match arg {
        None => default,
        Some(s) => s.parse().unwrap_or_else(|_| {
            eprintln!("{what} must be a number, got '{s}'");
            print_help();
            std::process::exit(2);
        }),
    }
}

fn print_help() {
    println!("hebbnet - offline Hebbian snake demo");
    println!();
    println!("Usage: hebbnet [steps] [hidden] [seed]");
    println!("  steps   ticks to simulate (default {DEFAULT_STEPS})");
    println!("  hidden  fully wired hidden neurons to add (default {DEFAULT_HIDDEN})");
    println!("  seed    world seed (default 1)");
    println!();
    println!("For interactive editing run the `hebbd` daemon and talk to it with `hebbnet-cli`.");
}
