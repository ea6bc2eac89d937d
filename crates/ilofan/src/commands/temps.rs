//! Temperature command handler.

use tabled::Tabled;

use ilofan_core::{FanController, TemperatureReading};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TempRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Critical")]
    critical: String,
    #[tabled(rename = "Context")]
    context: String,
    #[tabled(rename = "Health")]
    health: String,
}

fn celsius(value: Option<i64>) -> String {
    value.map_or_else(|| "-".into(), |c| format!("{c} °C"))
}

pub async fn handle(controller: &FanController, global: &GlobalOpts) -> Result<(), CliError> {
    let temps = controller.fetch_temperatures().await?;
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &temps,
        |t: &TemperatureReading| TempRow {
            name: t.name.clone(),
            reading: celsius(t.reading_celsius),
            critical: celsius(t.upper_critical_celsius),
            context: t.context.clone(),
            health: output::paint_health(t.health, color),
        },
        |t| {
            let reading = t.reading_celsius.map(|c| c.to_string()).unwrap_or_default();
            format!("{}\t{reading}", t.name)
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
