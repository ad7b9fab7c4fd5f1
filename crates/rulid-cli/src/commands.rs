use std::{io::Write, path::Path};

use anyhow::Context;
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use rulid::{
    Entropy, Error, MonotonicEntropy, OsRandom, RandSource, ThreadRandom, Ulid, ZeroRandom,
};

use crate::config::{GenerateConfig, InspectConfig, SourceKind, TimeFormat};

/// `Mon Jan 02 15:04:05.000 UTC 2006`
const DEFAULT_FORMAT: &str = "%a %b %d %H:%M:%S%.3f %Z %Y";

/// Prints `cfg.num` identifiers, one per line, stamped by `clock`.
pub fn generate(
    cfg: &GenerateConfig,
    clock: impl Fn() -> u64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut rng: Box<dyn RandSource> = match cfg.source {
        SourceKind::Os => Box::new(OsRandom),
        SourceKind::Quick => Box::new(ThreadRandom),
        SourceKind::Zero => Box::new(ZeroRandom),
    };

    if cfg.mono {
        let mut mono = MonotonicEntropy::new(rng, cfg.inc);
        for _ in 0..cfg.num {
            let id = loop {
                match Ulid::new(clock(), Entropy::Monotonic(&mut mono)) {
                    Err(Error::MonotonicOverflow) => {
                        tracing::debug!(backoff = ?cfg.backoff, "waiting for the next millisecond");
                        cfg.backoff.wait();
                    }
                    res => break res?,
                }
            };
            writeln!(out, "{id}")?;
        }
    } else {
        for _ in 0..cfg.num {
            let id = Ulid::new(clock(), Entropy::Random(&mut rng))?;
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

/// Prints the timestamp embedded in each identifier, one per line.
///
/// Identifiers are parsed leniently. The first malformed one aborts the run.
pub fn inspect(cfg: &InspectConfig, out: &mut impl Write) -> anyhow::Result<()> {
    for arg in &cfg.ulids {
        let text = if cfg.path {
            Path::new(arg)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(arg)
        } else {
            arg.as_str()
        };

        let id = Ulid::parse(text).with_context(|| format!("cannot inspect {text:?}"))?;
        let ms = i64::try_from(id.timestamp_ms())?;
        let utc = DateTime::<Utc>::from_timestamp_millis(ms)
            .with_context(|| format!("timestamp {ms} out of range"))?;

        let line = if cfg.local {
            render(cfg.format, &utc.with_timezone(&Local))
        } else {
            render(cfg.format, &utc)
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn render<Tz>(format: TimeFormat, t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match format {
        TimeFormat::Default => t.format(DEFAULT_FORMAT).to_string(),
        TimeFormat::Rfc3339 => t.to_rfc3339_opts(SecondsFormat::Millis, true),
        TimeFormat::Unix => t.timestamp().to_string(),
        TimeFormat::Millis => t.timestamp_millis().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backoff;
    use std::cell::Cell;

    const VECTOR_TEXT: &str = "01BX5ZZKBKACTAV9WEVGEMMVRZ";

    fn generate_cfg(num: usize, source: SourceKind, mono: bool) -> GenerateConfig {
        GenerateConfig {
            num,
            source,
            mono,
            inc: 0,
            backoff: Backoff::Spin,
        }
    }

    fn inspect_cfg(ulids: &[&str], format: TimeFormat, path: bool) -> InspectConfig {
        InspectConfig {
            ulids: ulids.iter().map(ToString::to_string).collect(),
            format,
            local: false,
            path,
        }
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn generates_the_requested_number_of_ids() {
        let mut out = Vec::new();
        generate(&generate_cfg(5, SourceKind::Quick, false), || 1_000, &mut out).unwrap();
        let ids = lines(&out);
        assert_eq!(ids.len(), 5);
        for id in &ids {
            let parsed = Ulid::parse_strict(id).unwrap();
            assert_eq!(parsed.timestamp_ms(), 1_000);
        }
    }

    #[test]
    fn zero_entropy_yields_zero_entropy_fields() {
        let mut out = Vec::new();
        generate(&generate_cfg(2, SourceKind::Zero, false), || 0, &mut out).unwrap();
        assert_eq!(lines(&out), ["00000000000000000000000000"; 2]);
    }

    #[test]
    fn monotonic_ids_increase_within_one_millisecond() {
        let mut out = Vec::new();
        generate(&generate_cfg(100, SourceKind::Os, true), || 42, &mut out).unwrap();
        let ids = lines(&out);
        assert_eq!(ids.len(), 100);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn monotonic_counter_restarts_every_millisecond() {
        // Two calls per millisecond.
        let tick = Cell::new(0_u64);
        let clock = || {
            let t = tick.get();
            tick.set(t + 1);
            t / 2
        };
        let mut cfg = generate_cfg(4, SourceKind::Zero, true);
        cfg.inc = 1;
        let mut out = Vec::new();
        generate(&cfg, clock, &mut out).unwrap();
        let ids: Vec<Ulid> = lines(&out)
            .iter()
            .map(|s| Ulid::parse_strict(s).unwrap())
            .collect();
        let entropy: Vec<u128> = ids.iter().map(|id| id.entropy_u80().into()).collect();
        assert_eq!(entropy, [0, 1, 0, 1]);
        assert_eq!(ids[2].timestamp_ms(), 1);
    }

    #[test]
    fn rejects_out_of_range_clocks() {
        let mut out = Vec::new();
        let err = generate(
            &generate_cfg(1, SourceKind::Zero, false),
            || Ulid::MAX_TIME + 1,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::BigTime { .. })));
    }

    #[test]
    fn inspects_in_every_format() {
        let cases = [
            (TimeFormat::Default, "Tue Oct 24 01:29:36.371 UTC 2017"),
            (TimeFormat::Rfc3339, "2017-10-24T01:29:36.371Z"),
            (TimeFormat::Unix, "1508808576"),
            (TimeFormat::Millis, "1508808576371"),
        ];
        for (format, expected) in cases {
            let mut out = Vec::new();
            inspect(&inspect_cfg(&[VECTOR_TEXT], format, false), &mut out).unwrap();
            assert_eq!(lines(&out), [expected]);
        }
    }

    #[test]
    fn local_time_preserves_the_instant() {
        let mut cfg = inspect_cfg(&[VECTOR_TEXT], TimeFormat::Millis, false);
        cfg.local = true;
        let mut out = Vec::new();
        inspect(&cfg, &mut out).unwrap();
        assert_eq!(lines(&out), ["1508808576371"]);
    }

    #[test]
    fn path_mode_strips_directory_and_extension() {
        let arg = format!("/var/data/{VECTOR_TEXT}.json");
        let mut out = Vec::new();
        inspect(&inspect_cfg(&[arg.as_str()], TimeFormat::Millis, true), &mut out).unwrap();
        assert_eq!(lines(&out), ["1508808576371"]);
    }

    #[test]
    fn inspect_parses_leniently_but_checks_length() {
        let mut out = Vec::new();
        // 'U' is outside the alphabet but lenient parsing lets it through.
        inspect(
            &inspect_cfg(&["01BX5ZZKBKACTAV9WEVGEMMVRU"], TimeFormat::Millis, false),
            &mut out,
        )
        .unwrap();
        assert_eq!(lines(&out), ["1508808576371"]);

        let err = inspect(&inspect_cfg(&["nope"], TimeFormat::Millis, false), &mut out).unwrap_err();
        assert!(err.to_string().contains("cannot inspect"), "{err}");
    }
}
