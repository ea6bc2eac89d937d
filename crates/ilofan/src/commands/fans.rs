//! Fan command handlers.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use ilofan_core::{FanController, FanReading, SpeedRequest};

use crate::cli::{FansArgs, FansCommand, GlobalOpts, Preset};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

/// Fan reading with its command index, which is its list position.
#[derive(Serialize)]
struct IndexedFan<'a> {
    index: usize,
    #[serde(flatten)]
    fan: &'a FanReading,
}

#[derive(Tabled)]
struct FanRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl FanRow {
    fn new(f: &IndexedFan<'_>, color: bool) -> Self {
        Self {
            index: f.index,
            name: f.fan.name.clone(),
            speed: format!("{}%", f.fan.current_value),
            health: output::paint_health(f.fan.health, color),
            state: f.fan.state.to_string(),
            location: f.fan.location.clone(),
        }
    }
}

impl Preset {
    fn percent(self) -> i64 {
        match self {
            Self::Quiet => 30,
            Self::Normal => 40,
            Self::Turbo => 80,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &FanController,
    args: FansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FansCommand::List => {
            let fans = controller.fetch_fans().await?;
            let indexed: Vec<IndexedFan<'_>> = fans
                .iter()
                .enumerate()
                .map(|(index, fan)| IndexedFan { index, fan })
                .collect();
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &indexed,
                |f| FanRow::new(f, color),
                |f| format!("{}\t{}\t{}", f.index, f.fan.name, f.fan.current_value),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FansCommand::Set {
            percent,
            all,
            from_json,
        } => {
            let request = match (all, from_json) {
                (Some(pct), _) => uniform(controller, pct).await?,
                (None, Some(path)) => SpeedRequest::from_json(&read_json(&path)?)?,
                (None, None) => SpeedRequest::from_percentages(percent)?,
            };
            controller.apply(&request).await?;
            report_applied(&request, global);
            Ok(())
        }

        FansCommand::Preset { preset } => {
            let request = uniform(controller, preset.percent()).await?;
            controller.apply(&request).await?;
            report_applied(&request, global);
            Ok(())
        }

        FansCommand::Unlock => {
            controller.unlock_fans().await?;
            output::print_status("Fans returned to automatic control", global.quiet);
            Ok(())
        }
    }
}

/// One percentage fanned out over the controller's current fan count.
///
/// The value is range-checked before telemetry is fetched.
async fn uniform(controller: &FanController, percent: i64) -> Result<SpeedRequest, CliError> {
    SpeedRequest::from_percentages([percent])?;
    let count = controller.fetch_fans().await?.len();
    Ok(SpeedRequest::uniform(percent, count)?)
}

fn read_json(path: &Path) -> Result<serde_json::Value, CliError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn report_applied(request: &SpeedRequest, global: &GlobalOpts) {
    let speeds = request
        .percentages()
        .iter()
        .map(|p| format!("{p}%"))
        .collect::<Vec<_>>()
        .join(" ");
    output::print_status(&format!("Fan speeds applied: {speeds}"), global.quiet);
}
