//! Command bodies: input assembly, encoder construction and output.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;
use ladder_config::Config;
use ladder_core::error::{Report, Result as CoreResult};
use ladder_core::mocks::NoopInput;
use ladder_core::runner::{self, EncoderEvent, PollSummary, RunParams};
use ladder_core::{CalibrationProfile, Combination, Encoder, EncoderBuilder, LadderParams};
use ladder_traits::{AnalogInput, MonotonicClock};
use serde_json::json;

/// Quarter steps the simulated shaft holds per read.
const SIM_READS_PER_PHASE: u32 = 4;

/// Open the sampling backend: MCP3008 on hardware builds, the simulated
/// ladder otherwise.
pub fn open_input(cfg: &Config) -> eyre::Result<(Box<dyn AnalogInput>, &'static str)> {
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    {
        let adc = ladder_hardware::HardwareAdc::new(cfg.input.spi_clock_hz)
            .map_err(|e| eyre::eyre!("open MCP3008: {e}"))?;
        tracing::info!(spi_clock_hz = cfg.input.spi_clock_hz, "MCP3008 ready");
        Ok((Box::new(adc), "mcp3008"))
    }
    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    {
        Ok((Box::new(simulated_input(cfg)?), "simulated"))
    }
}

/// Simulated ladder steered by `LADDER_SIM_SPIN`, `LADDER_SIM_BUTTON` and
/// `LADDER_SIM_FAULT_AFTER`.
#[cfg_attr(all(feature = "hardware", target_os = "linux"), allow(dead_code))]
fn simulated_input(cfg: &Config) -> eyre::Result<ladder_hardware::SimulatedLadder> {
    use ladder_hardware::{LadderResistors, SimulatedLadder, Spin};

    let spin = match std::env::var("LADDER_SIM_SPIN").ok().as_deref() {
        None | Some("" | "idle") => Spin::Idle,
        Some("cw") => Spin::Clockwise,
        Some("ccw") => Spin::CounterClockwise,
        Some(other) => eyre::bail!("LADDER_SIM_SPIN must be cw, ccw or idle, got '{other}'"),
    };
    let mut sim = SimulatedLadder::new(LadderResistors {
        r2: cfg.ladder.r2,
        encoder_a: cfg.ladder.encoder_a,
        encoder_b: cfg.ladder.encoder_b,
        encoder_button: cfg.ladder.encoder_button,
    })
    .spinning(spin, SIM_READS_PER_PHASE);
    if let Ok(n) = std::env::var("LADDER_SIM_FAULT_AFTER") {
        let n: u64 = n
            .parse()
            .wrap_err("LADDER_SIM_FAULT_AFTER must be a read count")?;
        sim = sim.with_fault_after(n);
    }
    if std::env::var("LADDER_SIM_BUTTON").is_ok_and(|v| v == "1") {
        sim.handle().set_button(true);
    }
    tracing::info!(?spin, "simulated ladder ready");
    Ok(sim)
}

pub fn make_encoder<A: AnalogInput>(cfg: &Config, input: A) -> CoreResult<Encoder<A>> {
    EncoderBuilder::new()
        .with_input(input)
        .with_pin(cfg.input.pin)
        .with_ladder(LadderParams::from(&cfg.ladder))
        .with_step_mode(cfg.decoder.mode.into())
        .strict(cfg.ladder.strict)
        .build()
}

/// Prints events as they arrive, keeping a running position.
struct EventPrinter {
    json: bool,
    position: i64,
}

impl EventPrinter {
    fn new(json: bool) -> Self {
        Self { json, position: 0 }
    }

    fn print(&mut self, ev: EncoderEvent) {
        if let EncoderEvent::Rotated(d) = ev {
            self.position += d.delta();
        }
        if self.json {
            println!(
                "{}",
                json!({ "kind": "event", "event": ev.name(), "position": self.position })
            );
        } else {
            println!("{:<12} position={}", ev.name(), self.position);
        }
    }
}

fn print_summary(s: &PollSummary, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "kind": "summary",
                "polls": s.polls,
                "cw": s.cw,
                "ccw": s.ccw,
                "position": s.position,
                "button_presses": s.button_presses,
                "overruns": s.overruns,
            })
        );
    } else {
        println!(
            "done: polls={} cw={} ccw={} position={} button_presses={} overruns={}",
            s.polls, s.cw, s.ccw, s.position, s.button_presses, s.overruns
        );
    }
}

pub fn run_live(
    cfg: &Config,
    polls: Option<u64>,
    rate_hz: Option<u32>,
    json: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<PollSummary> {
    let (input, backend) = open_input(cfg)?;
    let mut enc = make_encoder(cfg, input)?;
    let mut params = RunParams::from(&cfg.poll);
    if let Some(hz) = rate_hz {
        params.rate_hz = hz;
    }
    params.max_polls = polls;
    tracing::info!(backend, pin = cfg.input.pin, "decoding live input");

    let mut printer = EventPrinter::new(json);
    let summary = runner::run(&mut enc, &MonotonicClock::new(), params, shutdown, |ev| {
        printer.print(ev);
    })?;
    print_summary(&summary, json);
    Ok(summary)
}

pub fn replay_trace(cfg: &Config, trace: &Path, json: bool) -> eyre::Result<PollSummary> {
    let samples = ladder_config::load_trace_csv(trace)?;
    let mut enc = make_encoder(cfg, NoopInput)?;
    let mut printer = EventPrinter::new(json);
    let summary = runner::replay(&mut enc, &samples, |ev| printer.print(ev));
    print_summary(&summary, json);
    Ok(summary)
}

pub fn print_bands(cfg: &Config, json: bool) {
    let profile = CalibrationProfile::new(LadderParams::from(&cfg.ladder));
    let wired: Vec<Combination> = profile.wired().collect();
    if !json {
        println!(
            "{:<12} {:>8}  {:<12} wired",
            "combination", "ideal", "band"
        );
    }
    for c in Combination::ALL {
        let band = profile.band(c);
        let ideal = profile.ideal(c);
        let is_wired = wired.contains(&c);
        if json {
            println!(
                "{}",
                json!({
                    "kind": "band",
                    "combination": c.name(),
                    "ideal": ideal,
                    "low": band.low,
                    "high": band.high,
                    "wired": is_wired,
                })
            );
        } else {
            let ideal = ideal.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
            println!(
                "{:<12} {:>8}  {:<12} {}",
                c.name(),
                ideal,
                band.to_string(),
                if is_wired { "yes" } else { "no" }
            );
        }
    }
    for (first, second) in profile.overlaps() {
        if json {
            println!(
                "{}",
                json!({ "kind": "overlap", "first": first.name(), "second": second.name() })
            );
        } else {
            println!(
                "overlap: {first} {} and {second} {}",
                profile.band(first),
                profile.band(second)
            );
        }
    }
}

pub fn self_check(cfg: &Config, json: bool) -> eyre::Result<()> {
    let (input, backend) = open_input(cfg)?;
    let mut enc = make_encoder(cfg, input)?;
    enc.process().map_err(Report::new)?;
    let s = enc.switches();
    let raw = enc.last_raw().unwrap_or_default();
    if json {
        println!(
            "{}",
            json!({
                "kind": "sample",
                "backend": backend,
                "pin": enc.pin(),
                "raw": raw,
                "phase_a": s.phase_a,
                "phase_b": s.phase_b,
                "button": s.button,
                "code": format!("{:02b}", s.phase_code().bits()),
            })
        );
    } else {
        println!(
            "OK ({backend}): pin={} raw={raw} a={} b={} button={}",
            enc.pin(),
            u8::from(s.phase_a),
            u8::from(s.phase_b),
            u8::from(s.button)
        );
    }
    Ok(())
}
