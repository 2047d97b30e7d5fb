//! `From` implementations bridging `ladder_config` types to `ladder_core` types.

use crate::calibration::LadderParams;
use crate::quadrature::StepMode;
use crate::runner::RunParams;

// ── LadderCfg ────────────────────────────────────────────────────────────────

impl From<&ladder_config::LadderCfg> for LadderParams {
    fn from(c: &ladder_config::LadderCfg) -> Self {
        Self {
            r2: c.r2,
            encoder_a: c.encoder_a,
            encoder_b: c.encoder_b,
            encoder_button: c.encoder_button,
            read_tolerance: c.read_tolerance,
        }
    }
}

// ── StepMode ─────────────────────────────────────────────────────────────────

impl From<ladder_config::StepMode> for StepMode {
    fn from(m: ladder_config::StepMode) -> Self {
        match m {
            ladder_config::StepMode::Full => StepMode::Full,
            ladder_config::StepMode::Half => StepMode::Half,
        }
    }
}

// ── PollCfg ──────────────────────────────────────────────────────────────────

impl From<&ladder_config::PollCfg> for RunParams {
    fn from(c: &ladder_config::PollCfg) -> Self {
        Self {
            rate_hz: c.rate_hz,
            max_polls: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_cfg_maps_field_by_field() {
        let cfg = ladder_config::load_toml(
            r#"
            [ladder]
            r2 = 4700
            encoder_a = 1000
            encoder_b = 2200
            encoder_button = 6800
            read_tolerance = 12
            "#,
        )
        .unwrap();
        let p = LadderParams::from(&cfg.ladder);
        assert_eq!(p, LadderParams::new(4700, 1000, 2200).with_button(6800).with_tolerance(12));
        assert_eq!(StepMode::from(cfg.decoder.mode), StepMode::Full);
        assert_eq!(RunParams::from(&cfg.poll).rate_hz, 1000);
    }
}
