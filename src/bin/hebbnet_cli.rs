//! CLI client for the `hebbd` daemon.
//!
//! Examples:
//!   hebbnet-cli status
//!   hebbnet-cli start
//!   hebbnet-cli add 200 150
//!   hebbnet-cli connect 25 30 --weight 0.8
//!   hebbnet-cli neuron 30 activation relu
//!   hebbnet-cli edge 0 30 decay 0.05
//!
//! By default it talks to 127.0.0.1:9877; override with `--addr host:port`.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::process;
use std::time::Duration;

use hebbnet::graph::{
    ActivationKind, ConnectionParam, NeuronKey, NeuronKind, NeuronParam, Position,
};
use hebbnet::observer::NetworkSnapshot;
use hebbnet::protocol::{encode_line, Request, Response, StateSnapshot, DEFAULT_ADDR};

fn usage() -> ! {
    eprintln!("hebbnet-cli (talks to hebbd @ {DEFAULT_ADDR} by default)");
    eprintln!("Usage: hebbnet-cli [--addr host:port] <command> [args]\n");
    eprintln!("Commands:");
    eprintln!("  status                          Show driver state and diagnostics");
    eprintln!("  graph                           List neurons and connections");
    eprintln!("  start | stop | reset            Control the tick driver");
    eprintln!("  add <x> <y> [--bare]            Add a hidden neuron (wired unless --bare)");
    eprintln!("  remove <key>                    Remove a hidden neuron and its edges");
    eprintln!("  connect <from> <to> [--weight w] [--lr r] [--decay d]");
    eprintln!("  disconnect <from> <to>          Remove a connection");
    eprintln!("  neuron <key> <threshold|tau|activation|position> <value...>");
    eprintln!("  edge <from> <to> <weight|learning_rate|decay> <value>");
    eprintln!("  period <10-60000>               Set tick period in milliseconds");
    eprintln!("  shutdown                        Stop the daemon");
    process::exit(1);
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    let mut addr = DEFAULT_ADDR.to_string();
    if args.len() >= 2 && args[0] == "--addr" {
        addr = args[1].clone();
        args.drain(0..2);
    }

    if args.is_empty() {
        usage();
    }

    (addr, args)
}

fn arg<'a>(args: &'a [String], i: usize) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| usage())
}

fn num<T: std::str::FromStr>(s: &str, what: &str) -> T {
    s.parse()
        .unwrap_or_else(|_| fail(&format!("{what} must be a number, got '{s}'")))
}

fn key(s: &str) -> NeuronKey {
    NeuronKey(num(s.trim_start_matches('n'), "neuron key"))
}

/// Value of `--flag v` anywhere after the positional arguments.
fn flag(args: &[String], name: &str) -> Option<f32> {
    args.iter()
        .position(|a| a == name)
        .map(|i| num(arg(args, i + 1), name))
}

fn build_request(args: &[String]) -> Request {
    match args[0].as_str() {
        "status" => Request::GetState,
        "graph" => Request::GetGraph,
        "start" => Request::Start,
        "stop" => Request::Stop,
        "reset" => Request::Reset,
        "shutdown" => Request::Shutdown,
        "add" => Request::AddHidden {
            x: num(arg(args, 1), "x"),
            y: num(arg(args, 2), "y"),
            wired: !args.iter().any(|a| a == "--bare"),
        },
        "remove" => Request::RemoveHidden {
            key: key(arg(args, 1)),
        },
        "connect" => Request::AddConnection {
            from: key(arg(args, 1)),
            to: key(arg(args, 2)),
            weight: flag(args, "--weight"),
            learning_rate: flag(args, "--lr"),
            decay: flag(args, "--decay"),
        },
        "disconnect" => Request::RemoveConnection {
            from: key(arg(args, 1)),
            to: key(arg(args, 2)),
        },
        "neuron" => {
            let value = arg(args, 3);
            let param = match arg(args, 2) {
                "threshold" => NeuronParam::Threshold(num(value, "threshold")),
                "tau" => NeuronParam::Tau(num(value, "tau")),
                "activation" => NeuronParam::Activation(
                    ActivationKind::from_name(value)
                        .unwrap_or_else(|| fail("activation must be sigmoid|relu|threshold")),
                ),
                "position" => {
                    NeuronParam::Position(Position::new(num(value, "x"), num(arg(args, 4), "y")))
                }
                _ => fail("neuron field must be threshold|tau|activation|position"),
            };
            Request::SetNeuronParam {
                key: key(arg(args, 1)),
                param,
            }
        }
        "edge" => {
            let value: f32 = num(arg(args, 4), "value");
            let param = match arg(args, 3) {
                "weight" => ConnectionParam::Weight(value),
                "learning_rate" | "lr" => ConnectionParam::LearningRate(value),
                "decay" => ConnectionParam::Decay(value),
                _ => fail("edge field must be weight|learning_rate|decay"),
            };
            Request::SetConnectionParam {
                from: key(arg(args, 1)),
                to: key(arg(args, 2)),
                param,
            }
        }
        "period" => Request::SetTickPeriodMs {
            ms: num(arg(args, 1), "period"),
        },
        _ => usage(),
    }
}

fn send_request(addr: &str, req: &Request) -> Result<Response, String> {
    let mut stream = TcpStream::connect(addr).map_err(|e| format!("connect: {e}"))?;
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .map_err(|e| format!("set_read_timeout: {e}"))?;
    let mut reader = BufReader::new(stream.try_clone().map_err(|e| format!("clone: {e}"))?);

    let line = encode_line(req).map_err(|e| format!("serialize: {e}"))?;
    stream
        .write_all(line.as_bytes())
        .map_err(|e| format!("send: {e}"))?;

    let mut resp_line = String::new();
    reader
        .read_line(&mut resp_line)
        .map_err(|e| format!("recv: {e}"))?;
    serde_json::from_str(&resp_line).map_err(|e| format!("parse response: {e}"))
}

fn print_state(s: StateSnapshot) {
    let d = s.diagnostics;
    println!(
        "state={:?} period={}ms ticks={} last_action={}",
        s.state,
        s.tick_period_ms,
        d.ticks,
        s.last_action.map(|a| a.as_str()).unwrap_or("-"),
    );
    println!(
        "network: inputs={} hidden={} outputs={} conns={} mean_w={:.3} mean_hidden={:.3}",
        d.input_count,
        d.hidden_count,
        d.output_count,
        d.connection_count,
        d.mean_weight,
        d.mean_hidden_activity,
    );
    println!(
        "outputs: up={:.3} down={:.3} left={:.3} right={:.3}",
        d.outputs[0], d.outputs[1], d.outputs[2], d.outputs[3],
    );
    println!(
        "world: {}x{} agent=({}, {}) rewards={} steps={} collected={}",
        s.world.size,
        s.world.size,
        s.world.agent.0,
        s.world.agent.1,
        s.world.rewards,
        s.world.stats.steps,
        s.world.stats.collected,
    );
}

fn print_graph(g: NetworkSnapshot) {
    println!("tick {}", g.tick);
    for n in &g.neurons {
        let extra = match n.kind {
            NeuronKind::Hidden(p) => format!(
                " threshold={:.2} tau={:.2} {}",
                p.threshold,
                p.tau,
                p.activation.name()
            ),
            _ => String::new(),
        };
        println!(
            "{:>5} {:<6} a={:.3} @({:.0}, {:.0}){}",
            n.key.to_string(),
            n.kind.name(),
            n.activity,
            n.position.x,
            n.position.y,
            extra
        );
    }
    for c in &g.connections {
        println!(
            "{} -> {} w={:+.3} lr={:.3} decay={:.3}",
            c.from, c.to, c.weight, c.learning_rate, c.decay
        );
    }
}

fn main() {
    let (addr, args) = parse_args();
    let req = build_request(&args);

    match send_request(&addr, &req) {
        Ok(Response::State(s)) => print_state(s),
        Ok(Response::Graph(g)) => print_graph(g),
        Ok(Response::Success { message }) => println!("{message}"),
        Ok(Response::Error { kind, message }) => {
            eprintln!("Error ({kind}): {message}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed: {e}");
            process::exit(1);
        }
    }
}
