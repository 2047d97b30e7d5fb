//! Human-readable error descriptions and structured JSON error formatting.

use ladder_core::error::{BuildError, CalibrationError, EncoderError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ce) = err.downcast_ref::<CalibrationError>() {
        return match ce {
            CalibrationError::BandOverlap {
                first,
                first_band,
                second,
                second_band,
            } => format!(
                "What happened: Ladder combinations {first} {first_band} and {second} {second_band} cannot be told apart.\nLikely causes: Resistor values too close together or ladder.read_tolerance too wide.\nHow to fix: Spread the resistor values or lower ladder.read_tolerance; `ladder bands` shows every band. Set ladder.strict = false to decode anyway."
            ),
            CalibrationError::ZeroResistor(name) => format!(
                "What happened: ladder.{name} is 0 ohm.\nLikely causes: Missing value in the [ladder] section.\nHow to fix: Enter the fitted resistor value in ohms."
            ),
            CalibrationError::ZeroTolerance => {
                "What happened: ladder.read_tolerance is 0, so no sample can match a band.\nLikely causes: Tolerance left at 0 in the config.\nHow to fix: Use a tolerance of a few counts (default 25).".to_string()
            }
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingLadder => {
                "What happened: No resistor ladder was provided to the encoder.\nLikely causes: The [ladder] section was not wired into the builder.\nHow to fix: Pass the ladder via with_ladder(...).".to_string()
            }
        };
    }

    if let Some(ee) = err.downcast_ref::<EncoderError>() {
        return match ee {
            EncoderError::Hardware(msg) | EncoderError::HardwareFault(msg) => format!(
                "What happened: Reading the analog input failed ({msg}).\nLikely causes: ADC not wired or powered, SPI disabled, or wrong channel.\nHow to fix: Check [input].pin and [input].spi_clock_hz, enable SPI, and verify wiring."
            ),
            EncoderError::Exhausted => {
                "What happened: The analog input ran out of samples.\nLikely causes: A scripted input shorter than the requested polls.\nHow to fix: Provide more samples or lower --polls.".to_string()
            }
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("invalid configuration") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Missing [ladder] section, or out-of-range values.\nHow to fix: Edit the TOML config and try again; etc/ladder.toml is a complete sample."
        );
    }

    if lower.contains("read config") {
        return format!(
            "What happened: Could not read the config file ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config with an existing TOML file."
        );
    }

    // Trace CSV header special-case
    if lower.contains("trace csv must have header") {
        return "Invalid header in trace CSV. Expected 'raw'.".to_string();
    }

    if lower.contains("ladder_sim_") {
        return format!(
            "What happened: Simulator environment is invalid ({msg}).\nHow to fix: Use LADDER_SIM_SPIN=cw|ccw|idle and LADDER_SIM_BUTTON=1."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable short name for the error kind, used in JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(ce) = err.downcast_ref::<CalibrationError>() {
        return match ce {
            CalibrationError::BandOverlap { .. } => "BandOverlap",
            CalibrationError::ZeroResistor(_) => "ZeroResistor",
            CalibrationError::ZeroTolerance => "ZeroTolerance",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "BuildError";
    }
    if let Some(ee) = err.downcast_ref::<EncoderError>() {
        return match ee {
            EncoderError::Hardware(_) | EncoderError::HardwareFault(_) => "HardwareFault",
            EncoderError::Exhausted => "Exhausted",
        };
    }
    "Error"
}

/// Map typed errors to stable exit codes; everything else returns 1.
///
/// 2 is left to clap for usage errors.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<CalibrationError>().is_some() {
        return 3;
    }
    if let Some(ee) = err.downcast_ref::<EncoderError>() {
        return match ee {
            EncoderError::Hardware(_) | EncoderError::HardwareFault(_) => 4,
            EncoderError::Exhausted => 5,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 6;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    if let Some(CalibrationError::BandOverlap {
        first,
        first_band,
        second,
        second_band,
    }) = err.downcast_ref::<CalibrationError>()
    {
        return json!({
            "reason": reason_name(err),
            "details": {
                "first": first.name(),
                "first_band": [first_band.low, first_band.high],
                "second": second.name(),
                "second_band": [second_band.low, second_band.high],
            },
            "message": msg,
        })
        .to_string();
    }

    json!({ "reason": reason_name(err), "message": msg }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_core::{Band, Combination};

    fn overlap() -> eyre::Report {
        eyre::Report::new(CalibrationError::BandOverlap {
            first: Combination::A,
            first_band: Band { low: 486, high: 536 },
            second: Combination::B,
            second_band: Band { low: 486, high: 536 },
        })
    }

    #[test]
    fn overlap_is_explained_and_has_details() {
        let err = overlap();
        assert!(humanize(&err).starts_with("What happened: Ladder combinations A [486, 536]"));
        assert_eq!(exit_code_for_error(&err), 3);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "BandOverlap");
        assert_eq!(v["details"]["second"], "B");
        assert_eq!(v["details"]["first_band"][1], 536);
    }

    #[test]
    fn hardware_faults_have_their_own_exit_code() {
        let err = eyre::Report::new(EncoderError::HardwareFault("spi error: bus".into()));
        assert_eq!(exit_code_for_error(&err), 4);
        assert!(humanize(&err).contains("spi error: bus"));
    }

    #[test]
    fn untyped_errors_fall_back_to_generic_text() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).contains("Original: boom"));
        assert_eq!(reason_name(&err), "Error");
    }
}
