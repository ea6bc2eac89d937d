//! Config subcommand handlers.

use ilofan_config::{Settings, save_settings};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn describe(settings: &Settings) -> String {
    let or_unset = |v: Option<&str>| v.unwrap_or("(unset)").to_owned();
    let kex = if settings.kex.is_empty() {
        "(default)".to_owned()
    } else {
        settings.kex.join(", ")
    };
    [
        ("host", or_unset(settings.host.as_deref())),
        ("username", or_unset(settings.username.as_deref())),
        ("password", or_unset(settings.password.as_deref())),
        ("ssh_port", settings.ssh_port.to_string()),
        ("timeout", format!("{}s", settings.timeout)),
        ("insecure", settings.insecure.to_string()),
        (
            "ca_cert",
            settings
                .ca_cert
                .as_ref()
                .map_or_else(|| "(unset)".to_owned(), |p| p.display().to_string()),
        ),
        ("kex", kex),
        ("redfish_url", or_unset(settings.redfish_url.as_deref())),
    ]
    .iter()
    .map(|(key, value)| format!("{key:<12} {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::settings_path(global);

    match args.command {
        ConfigCommand::Init {
            host,
            username,
            force,
        } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let settings = Settings {
                host,
                username,
                ..Settings::default()
            };
            save_settings(&settings, &path)?;
            output::print_status(
                &format!(
                    "Wrote {}\nSet ILO_PASSWORD in the environment to authenticate.",
                    path.display()
                ),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let settings = config::load(global)?.redacted();
            let out = output::render_single(&global.output, &settings, describe);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
