//! The single owned store behind the daemon's lock: network, driver and world.

use std::time::{Duration, Instant};

use hebbnet::driver::{TickDriver, TickReport};
use hebbnet::error::NetError;
use hebbnet::graph::Position;
use hebbnet::network::{Direction, Network};
use hebbnet::observer::{Diagnostics, NetworkSnapshot};
use hebbnet::protocol::{Request, Response, StateSnapshot, WorldView};
use hebbnet::wiring::Unwired;
use hebbnet::world::{World, WorldConfig};
use tracing::{debug, info};

use crate::config::{DaemonConfig, MAX_TICK_PERIOD_MS, MIN_TICK_PERIOD_MS};

pub struct Session {
    network: Network,
    driver: TickDriver,
    world: World,
    world_cfg: WorldConfig,
    last_action: Option<Direction>,
}

impl Session {
    pub fn new(cfg: &DaemonConfig) -> Result<Self, NetError> {
        let period_ms = cfg
            .tick_period_ms
            .clamp(MIN_TICK_PERIOD_MS, MAX_TICK_PERIOD_MS);
        Ok(Self {
            network: Network::with_config(cfg.network)?,
            driver: TickDriver::new(Duration::from_millis(period_ms)),
            world: World::new(cfg.world),
            world_cfg: cfg.world,
            last_action: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn period(&self) -> Duration {
        self.driver.period()
    }

    #[cfg(test)]
    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn tick(&mut self, now: Instant) -> Option<TickReport> {
        let report = self.driver.tick(&mut self.network, &mut self.world, now)?;
        self.last_action = Some(report.action);
        Some(report)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            state: self.driver.state(),
            tick_period_ms: self.driver.period().as_millis() as u64,
            last_action: self.last_action,
            diagnostics: Diagnostics::capture(&self.network),
            world: WorldView {
                size: self.world.size(),
                agent: self.world.agent(),
                rewards: self.world.reward_count(),
                stats: self.world.stats(),
            },
        }
    }

    /// Answer a read-only request; `None` for anything that mutates.
    pub fn query(&self, request: &Request) -> Option<Response> {
        match request {
            Request::GetState => Some(Response::State(self.snapshot())),
            Request::GetGraph => Some(Response::Graph(NetworkSnapshot::capture(&self.network))),
            _ => None,
        }
    }

    /// Serve one request. Scheduling side effects (ticker start/stop) are the
    /// caller's job; this only touches the session.
    pub fn apply(&mut self, request: Request) -> Response {
        match self.try_apply(request) {
            Ok(resp) => resp,
            Err(e) => {
                debug!(kind = e.kind(), "request failed: {e}");
                e.into()
            }
        }
    }

    fn try_apply(&mut self, request: Request) -> Result<Response, NetError> {
        let resp = match request {
            Request::GetState => Response::State(self.snapshot()),
            Request::GetGraph => Response::Graph(NetworkSnapshot::capture(&self.network)),
            Request::Start => {
                if self.driver.start() {
                    info!("simulation started");
                    Response::success("Started")
                } else {
                    Response::success("Already running")
                }
            }
            Request::Stop => {
                if self.driver.stop() {
                    info!(ticks = self.network.ticks(), "simulation stopped");
                    Response::success("Stopped")
                } else {
                    Response::success("Already stopped")
                }
            }
            Request::Reset => {
                self.driver.reset(&mut self.network);
                self.world = World::new(self.world_cfg);
                self.last_action = None;
                info!("network and world reset");
                Response::success("Reset")
            }
            Request::AddHidden { x, y, wired } => {
                let position = Position::new(x, y);
                let key = if wired {
                    self.network.add_hidden_default(position)?
                } else {
                    self.network.add_hidden_wired(position, &Unwired)?
                };
                Response::success(format!("Added hidden neuron {key}"))
            }
            Request::RemoveHidden { key } => {
                let removed = self.network.remove_hidden_neuron(key)?;
                Response::success(format!(
                    "Removed hidden neuron {key} and {removed} connection(s)"
                ))
            }
            Request::AddConnection {
                from,
                to,
                weight,
                learning_rate,
                decay,
            } => {
                let params = Request::connection_params(
                    self.network.config().wiring,
                    weight,
                    learning_rate,
                    decay,
                );
                self.network.add_connection(from, to, params)?;
                Response::success(format!("Connected {from} -> {to}"))
            }
            Request::RemoveConnection { from, to } => {
                self.network.remove_connection(from, to)?;
                Response::success(format!("Disconnected {from} -> {to}"))
            }
            Request::SetNeuronParam { key, param } => {
                self.network.set_neuron_param(key, param)?;
                Response::success(format!("Set {} on {key}", param.field_name()))
            }
            Request::SetConnectionParam { from, to, param } => {
                self.network.set_connection_param(from, to, param)?;
                Response::success(format!("Updated {from} -> {to}"))
            }
            Request::SetTickPeriodMs { ms } => {
                let clamped = ms.clamp(MIN_TICK_PERIOD_MS, MAX_TICK_PERIOD_MS);
                self.driver.set_period(Duration::from_millis(clamped));
                info!("Tick period set to {} ms", clamped);
                Response::success(format!("Tick period set to {clamped} ms"))
            }
            Request::Shutdown => Response::success("Shutting down"),
        };
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hebbnet::driver::DriverState;
    use hebbnet::graph::{ConnectionParam, NeuronKey, NeuronParam};

    fn session() -> Session {
        Session::new(&DaemonConfig::default()).unwrap()
    }

    fn is_success(resp: &Response) -> bool {
        matches!(resp, Response::Success { .. })
    }

    fn error_kind(resp: Response) -> String {
        match resp {
            Response::Error { kind, .. } => kind,
            other => panic!("expected error, got {other:?}"),
        }
    }

    fn state(s: &mut Session) -> StateSnapshot {
        match s.apply(Request::GetState) {
            Response::State(st) => st,
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle_with_canonical_network() {
        let mut s = session();
        let st = state(&mut s);
        assert_eq!(st.state, DriverState::Idle);
        assert_eq!(st.diagnostics.input_count, 26);
        assert_eq!(st.diagnostics.output_count, 4);
        assert_eq!(st.world.agent, (1, 1));
        assert_eq!(st.tick_period_ms, 100);
    }

    #[test]
    fn ticks_only_while_running() {
        let mut s = session();
        let t0 = Instant::now();
        assert!(s.tick(t0).is_none());

        assert!(is_success(&s.apply(Request::Start)));
        let report = s.tick(t0).unwrap();
        let st = state(&mut s);
        assert_eq!(st.state, DriverState::Running);
        assert_eq!(st.last_action, Some(report.action));
        assert_eq!(st.diagnostics.ticks, 1);
        assert_eq!(st.world.stats.steps, 1);

        s.apply(Request::Stop);
        assert!(s.tick(t0 + Duration::from_millis(100)).is_none());
    }

    #[test]
    fn edits_map_errors_to_kinds() {
        let mut s = session();
        assert!(is_success(&s.apply(Request::AddHidden {
            x: 0.0,
            y: 0.0,
            wired: true
        })));
        let hidden = NeuronKey(30);
        assert_eq!(s.network().graph().connection_count(), 30);

        let dup = s.apply(Request::AddConnection {
            from: s.network().output_key(Direction::Up),
            to: hidden,
            weight: None,
            learning_rate: None,
            decay: None,
        });
        assert_eq!(error_kind(dup), "duplicate_connection");

        let missing = s.apply(Request::RemoveHidden { key: NeuronKey(999) });
        assert_eq!(error_kind(missing), "not_found");

        let wrong_kind = s.apply(Request::SetNeuronParam {
            key: NeuronKey(0),
            param: NeuronParam::Tau(2.0),
        });
        assert_eq!(error_kind(wrong_kind), "invalid_kind");

        let bad_tau = s.apply(Request::SetNeuronParam {
            key: hidden,
            param: NeuronParam::Tau(0.0),
        });
        assert_eq!(error_kind(bad_tau), "invalid_parameter");

        assert!(is_success(&s.apply(Request::SetConnectionParam {
            from: NeuronKey(0),
            to: hidden,
            param: ConnectionParam::Weight(5.0),
        })));
        assert_eq!(
            s.network().graph().connection(NeuronKey(0), hidden).unwrap().weight,
            1.0
        );

        assert!(is_success(&s.apply(Request::RemoveHidden { key: hidden })));
        assert_eq!(s.network().graph().connection_count(), 0);
    }

    #[test]
    fn unwired_hidden_and_manual_connection() {
        let mut s = session();
        s.apply(Request::AddHidden {
            x: 1.0,
            y: 1.0,
            wired: false,
        });
        let hidden = NeuronKey(30);
        assert_eq!(s.network().graph().connection_count(), 0);
        assert!(s.network().graph().neuron(hidden).unwrap().kind.is_hidden());

        let reward = s.network().reward_key();
        assert!(is_success(&s.apply(Request::AddConnection {
            from: reward,
            to: hidden,
            weight: Some(-0.25),
            learning_rate: None,
            decay: None,
        })));
        let c = s.network().graph().connection(reward, hidden).unwrap();
        assert_eq!(c.weight, -0.25);
        assert_eq!(c.learning_rate, 0.1);

        assert!(is_success(&s.apply(Request::RemoveConnection {
            from: reward,
            to: hidden
        })));
        let again = s.apply(Request::RemoveConnection {
            from: reward,
            to: hidden,
        });
        assert_eq!(error_kind(again), "not_found");
    }

    #[test]
    fn reset_restores_everything() {
        let mut s = session();
        s.apply(Request::AddHidden {
            x: 0.0,
            y: 0.0,
            wired: true,
        });
        s.apply(Request::Start);
        s.tick(Instant::now());

        assert!(is_success(&s.apply(Request::Reset)));
        let st = state(&mut s);
        assert_eq!(st.state, DriverState::Idle);
        assert_eq!(st.diagnostics.hidden_count, 0);
        assert_eq!(st.diagnostics.connection_count, 0);
        assert_eq!(st.diagnostics.ticks, 0);
        assert_eq!(st.world.agent, (1, 1));
        assert_eq!(st.world.stats.steps, 0);
        assert_eq!(st.last_action, None);
    }

    #[test]
    fn tick_period_is_clamped() {
        let mut s = session();
        s.apply(Request::SetTickPeriodMs { ms: 1 });
        assert_eq!(s.period(), Duration::from_millis(MIN_TICK_PERIOD_MS));
        s.apply(Request::SetTickPeriodMs { ms: 250 });
        assert_eq!(state(&mut s).tick_period_ms, 250);
    }

    #[test]
    fn query_only_answers_reads() {
        let s = session();
        assert!(matches!(s.query(&Request::GetGraph), Some(Response::Graph(_))));
        assert!(matches!(s.query(&Request::GetState), Some(Response::State(_))));
        assert!(s.query(&Request::Start).is_none());
    }
}
