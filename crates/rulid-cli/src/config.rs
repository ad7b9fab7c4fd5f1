use anyhow::bail;
use clap::Parser;

/// Command-line arguments for the `rulid` binary.
///
/// Without positional arguments the tool generates identifiers; with one or
/// more it inspects them and prints their embedded timestamps. Most options
/// can also be set through environment variables or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rulid",
    version,
    about = "Generate or inspect ULIDs",
    after_help = "Generate: rulid [options]\nInspect:  rulid [options] ULID [ULID ...]"
)]
pub struct CliArgs {
    /// Identifiers to inspect. Generates new ones when empty.
    #[arg(value_name = "ULID")]
    pub ulids: Vec<String>,

    /// Number of ULIDs to generate.
    ///
    /// Environment variable: `RULID_NUM`
    #[arg(short, long, env = "RULID_NUM", default_value_t = 1, allow_negative_numbers = true)]
    pub num: i64,

    /// Use quick entropy from the thread-local RNG instead of the OS.
    #[arg(short, long, default_value_t = false)]
    pub quick: bool,

    /// Use monotonic entropy, so identifiers generated within the same
    /// millisecond keep increasing.
    #[arg(short, long, default_value_t = false)]
    pub mono: bool,

    /// Use zero entropy. Takes precedence over `--quick`.
    #[arg(short, long, default_value_t = false)]
    pub zero: bool,

    /// Exclusive upper bound of the monotonic increment; 0 selects 2^32.
    ///
    /// Environment variable: `RULID_INC`
    #[arg(long, env = "RULID_INC", default_value_t = 0)]
    pub inc: u64,

    /// How to wait when monotonic entropy overflows within a millisecond:
    /// spin, yield or sleep.
    ///
    /// Environment variable: `RULID_BACKOFF`
    #[arg(long, env = "RULID_BACKOFF", default_value = "spin")]
    pub backoff: String,

    /// Time format for inspection: default, rfc3339, unix or ms.
    ///
    /// Environment variable: `RULID_FORMAT`
    #[arg(short, long, env = "RULID_FORMAT", default_value = "default")]
    pub format: String,

    /// Print inspected times in the local time zone instead of UTC.
    #[arg(short, long, default_value_t = false)]
    pub local: bool,

    /// Treat each argument as a path whose file name is a ULID. The
    /// directory and extension are stripped.
    #[arg(short, long, default_value_t = false)]
    pub path: bool,
}

/// Where generated entropy comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Os,
    Quick,
    Zero,
}

/// Strategies for waiting out a monotonic overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Busy-waits in a tight loop.
    Spin,
    /// Yields to the OS scheduler.
    Yield,
    /// Sleeps for one millisecond.
    Sleep,
}

impl Backoff {
    pub fn wait(self) {
        match self {
            Self::Spin => core::hint::spin_loop(),
            Self::Yield => std::thread::yield_now(),
            Self::Sleep => std::thread::sleep(core::time::Duration::from_millis(1)),
        }
    }
}

/// Output format for inspected timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Default,
    Rfc3339,
    Unix,
    Millis,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub num: usize,
    pub source: SourceKind,
    pub mono: bool,
    pub inc: u64,
    pub backoff: Backoff,
}

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub ulids: Vec<String>,
    pub format: TimeFormat,
    pub local: bool,
    pub path: bool,
}

#[derive(Debug, Clone)]
pub enum Config {
    Generate(GenerateConfig),
    Inspect(InspectConfig),
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.ulids.is_empty() {
            let format = match args.format.to_ascii_lowercase().as_str() {
                "default" => TimeFormat::Default,
                "rfc3339" => TimeFormat::Rfc3339,
                "unix" => TimeFormat::Unix,
                "ms" => TimeFormat::Millis,
                other => bail!("invalid --format {other}"),
            };
            return Ok(Self::Inspect(InspectConfig {
                ulids: args.ulids,
                format,
                local: args.local,
                path: args.path,
            }));
        }

        if args.num < 1 {
            bail!("invalid --num {}", args.num);
        }
        let num = usize::try_from(args.num)?;

        let backoff = match args.backoff.to_ascii_lowercase().as_str() {
            "spin" => Backoff::Spin,
            "yield" => Backoff::Yield,
            "sleep" => Backoff::Sleep,
            other => bail!("invalid --backoff {other}"),
        };

        let source = if args.zero {
            SourceKind::Zero
        } else if args.quick {
            SourceKind::Quick
        } else {
            SourceKind::Os
        };

        Ok(Self::Generate(GenerateConfig {
            num,
            source,
            mono: args.mono,
            inc: args.inc,
            backoff,
        }))
    }
}
