#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and trace parsing for the ladder encoder.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Trace CSV loader enforces the `raw` header and the 10-bit sample range.
use serde::Deserialize;

/// Highest raw count a trace row may carry.
pub const MAX_RAW: u16 = 1023;

/// Highest MCP3008 channel index.
pub const MAX_PIN: u8 = 7;

/// Trace CSV schema.
///
/// Expected header:
/// raw
///
/// Example:
/// raw
/// 0
/// 511
/// 613
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TraceRow {
    pub raw: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputCfg {
    /// ADC channel handed to the sampling primitive.
    pub pin: u8,
    /// SPI clock for the MCP3008 backend.
    pub spi_clock_hz: u32,
}

impl Default for InputCfg {
    fn default() -> Self {
        Self {
            pin: 0,
            spi_clock_hz: 1_000_000,
        }
    }
}

/// Resistor ladder wiring. Values are in ohms.
#[derive(Debug, Deserialize)]
pub struct LadderCfg {
    /// Reference resistor between the sense node and ground.
    pub r2: u32,
    pub encoder_a: u32,
    pub encoder_b: u32,
    /// Button resistor; 0 means no button is wired.
    #[serde(default)]
    pub encoder_button: u32,
    /// Half-width of each acceptance band, in ADC counts.
    #[serde(default = "default_read_tolerance")]
    pub read_tolerance: u16,
    /// Reject overlapping bands when the encoder is built.
    #[serde(default)]
    pub strict: bool,
}

const fn default_read_tolerance() -> u16 {
    25
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    /// One event per detent, emitted at the seated position.
    #[default]
    Full,
    /// Events at both the seated and the unseated position.
    Half,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DecoderCfg {
    pub mode: StepMode,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollCfg {
    /// Poll cadence of the run loop. Also accepts alias "hz".
    #[serde(alias = "hz")]
    pub rate_hz: u32,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self { rate_hz: 1000 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputCfg,
    pub ladder: LadderCfg,
    #[serde(default)]
    pub decoder: DecoderCfg,
    #[serde(default)]
    pub poll: PollCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load a recorded sample trace.
pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<u16>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(str::to_string).collect();
    if actual != ["raw"] {
        eyre::bail!("trace CSV must have header 'raw', got: {}", actual.join(","));
    }

    let mut samples = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        let row = match rec {
            Ok(row) => row,
            Err(e) => eyre::bail!("invalid CSV row {}: {}", idx + 2, e),
        };
        if row.raw > MAX_RAW {
            eyre::bail!(
                "CSV row {}: raw value {} exceeds {}",
                idx + 2,
                row.raw,
                MAX_RAW
            );
        }
        samples.push(row.raw);
    }
    Ok(samples)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Input
        if self.input.pin > MAX_PIN {
            eyre::bail!("input.pin must be in 0..={MAX_PIN}");
        }
        if self.input.spi_clock_hz == 0 {
            eyre::bail!("input.spi_clock_hz must be > 0");
        }

        // Ladder
        if self.ladder.r2 == 0 {
            eyre::bail!("ladder.r2 must be > 0");
        }
        if self.ladder.encoder_a == 0 {
            eyre::bail!("ladder.encoder_a must be > 0");
        }
        if self.ladder.encoder_b == 0 {
            eyre::bail!("ladder.encoder_b must be > 0");
        }
        if self.ladder.read_tolerance == 0 || self.ladder.read_tolerance > 255 {
            eyre::bail!("ladder.read_tolerance must be in 1..=255");
        }

        // Poll
        if self.poll.rate_hz == 0 || self.poll.rate_hz > 100_000 {
            eyre::bail!("poll.rate_hz must be in 1..=100000");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
            }
        }

        // Decoder: serde restricts to known modes

        Ok(())
    }
}
