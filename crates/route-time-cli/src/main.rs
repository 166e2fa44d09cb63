use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use route_time::{
    Direction, GraphId, Location, SingleZone, Step, TimeContext, TimeInfo, TimeTrackingConfig,
    TimezoneDb, WeekStartDay, ZoneIndex,
};
use serde_json::json;

#[derive(Parser)]
#[command(name = "route-time", version, about = "Inspect route time tracking")]
struct Cli {
    /// JSON time-tracking config (default_timezone, week_start)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the origin time info for a zone and requested date-time
    Make {
        #[command(flatten)]
        origin: OriginArgs,
    },
    /// Build the origin and step it across a list of edges
    Walk {
        #[command(flatten)]
        origin: OriginArgs,
        /// Edge as SECONDS or SECONDS@ZONE; the zone carries over when omitted
        #[arg(long = "step", required = true)]
        steps: Vec<String>,
        /// Walk backwards in time (arrive-by)
        #[arg(long)]
        reverse: bool,
    },
    /// List the timezone table
    Zones {
        /// Only zones whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(clap::Args)]
struct OriginArgs {
    /// IANA timezone of the origin; without it the config's default_timezone applies
    #[arg(long)]
    timezone: Option<String>,
    /// "current" or a local YYYY-MM-DDTHH:MM; omit for no time tracking
    #[arg(long)]
    date_time: Option<String>,
    #[arg(long, value_enum)]
    week_start: Option<WeekStartArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStartArg {
    Monday,
    Sunday,
}

impl From<WeekStartArg> for WeekStartDay {
    fn from(arg: WeekStartArg) -> Self {
        match arg {
            WeekStartArg::Monday => WeekStartDay::Monday,
            WeekStartArg::Sunday => WeekStartDay::Sunday,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let db = TimezoneDb::global();

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            TimeTrackingConfig::from_json(&text)?
        }
        None => TimeTrackingConfig::default(),
    };

    let output = match cli.command {
        Command::Make { origin } => {
            let (location, start) = make_origin(db, &mut config, &origin)?;
            json!({ "date_time": location.date_time, "time_info": start })
        }
        Command::Walk {
            origin,
            steps,
            reverse,
        } => {
            let (location, start) = make_origin(db, &mut config, &origin)?;
            let steps = parse_steps(db, start.zone_index(), &steps)?;
            let direction = if reverse {
                Direction::Reverse
            } else {
                Direction::Forward
            };
            let points = start.walk(steps, direction, db);
            log::debug!("walked {} points", points.len());
            json!({ "date_time": location.date_time, "points": points })
        }
        Command::Zones { filter } => {
            let zones: Vec<_> = db
                .iter()
                .filter(|(_, tz)| filter.as_deref().is_none_or(|f| tz.name().contains(f)))
                .map(|(index, tz)| json!({ "index": index, "name": tz.name() }))
                .collect();
            json!(zones)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn make_origin(
    db: &TimezoneDb,
    config: &mut TimeTrackingConfig,
    args: &OriginArgs,
) -> Result<(Location, TimeInfo)> {
    if let Some(week_start) = args.week_start {
        config.week_start = week_start.into();
    }
    let ctx = TimeContext::new(db, config)?;

    let mut location = Location::new(vec![0]);
    location.date_time = args.date_time.clone();
    let start = match args.timezone.as_deref() {
        Some(name) => {
            let zone = zone_index(db, name)?;
            TimeInfo::make(&mut location, &SingleZone(zone), &ctx)
        }
        // an edge without timezone data, so only the configured default can apply
        None => TimeInfo::make(&mut location, &HashMap::<GraphId, ZoneIndex>::new(), &ctx),
    };
    if !start.is_valid() {
        log::info!("no time tracking for {:?}", args.date_time);
    }
    Ok((location, start))
}

fn zone_index(db: &TimezoneDb, name: &str) -> Result<ZoneIndex> {
    db.index_of(name)
        .ok_or_else(|| anyhow!("unknown timezone '{name}'"))
}

fn parse_steps(db: &TimezoneDb, origin_zone: ZoneIndex, raw: &[String]) -> Result<Vec<Step>> {
    let mut zone = origin_zone;
    raw.iter()
        .map(|s| {
            let (seconds, next) = match s.split_once('@') {
                Some((seconds, name)) => (seconds, Some(name)),
                None => (s.as_str(), None),
            };
            let seconds: u32 = seconds
                .trim()
                .parse()
                .with_context(|| format!("bad step duration in '{s}'"))?;
            if let Some(name) = next {
                zone = zone_index(db, name.trim())?;
            }
            if zone == route_time::NO_ZONE {
                bail!("step '{s}' has no zone and the origin has none to carry over");
            }
            Ok(Step::new(seconds, zone))
        })
        .collect()
}
