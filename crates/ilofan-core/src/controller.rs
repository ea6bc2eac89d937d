// ── Fan controller facade ──
//
// Entry point for fan telemetry and fan control. Each operation resolves
// credentials, builds its own Redfish client or command session, and tears
// it down before returning. No state survives between calls.

use std::sync::Arc;

use ilofan_api::redfish::Thermal;
use ilofan_api::{CommandSession, Credentials, RedfishClient, SessionConnector, SshConnector};
use tracing::{debug, info, warn};

use crate::command::FanCommand;
use crate::config::{ControllerConfig, CredentialResolver};
use crate::error::CoreError;
use crate::model::{FanReading, TemperatureReading};
use crate::speed::SpeedRequest;

// ── WriteStage ───────────────────────────────────────────────────

/// Progress of a speed write, emitted as `debug` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Validated { fans: usize },
    FanCountConfirmed { fans: usize },
    SessionOpen,
    Written { index: usize, speed: u8 },
    Complete,
}

// ── FanController ────────────────────────────────────────────────

/// Fan telemetry and control for one management controller.
///
/// Cheaply cloneable via `Arc`. Generic over the session connector so the
/// command channel can be replaced in tests.
pub struct FanController<C = SshConnector> {
    inner: Arc<ControllerInner<C>>,
}

struct ControllerInner<C> {
    config: ControllerConfig,
    resolver: Arc<dyn CredentialResolver>,
    connector: C,
}

impl<C> Clone for FanController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl FanController<SshConnector> {
    /// Controller that reaches the command interface over SSH.
    pub fn new(config: ControllerConfig, resolver: Arc<dyn CredentialResolver>) -> Self {
        let connector = SshConnector::new(config.session.clone());
        Self::with_connector(config, resolver, connector)
    }
}

impl<C: SessionConnector> FanController<C> {
    pub fn with_connector(
        config: ControllerConfig,
        resolver: Arc<dyn CredentialResolver>,
        connector: C,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                config,
                resolver,
                connector,
            }),
        }
    }

    // ── Telemetry ────────────────────────────────────────────────

    /// Current fan readings, in controller order.
    ///
    /// A Thermal resource without a `Fans` field yields an empty list.
    pub async fn fetch_fans(&self) -> Result<Vec<FanReading>, CoreError> {
        let credentials = self.credentials()?;
        let thermal = self.thermal(&credentials).await?;
        Ok(thermal.fans.iter().map(FanReading::from).collect())
    }

    /// Temperature sensors from the same Thermal resource.
    pub async fn fetch_temperatures(&self) -> Result<Vec<TemperatureReading>, CoreError> {
        let credentials = self.credentials()?;
        let thermal = self.thermal(&credentials).await?;
        Ok(thermal
            .temperatures
            .iter()
            .map(TemperatureReading::from)
            .collect())
    }

    // ── Control ──────────────────────────────────────────────────

    /// Return every fan to automatic control.
    pub async fn unlock_fans(&self) -> Result<(), CoreError> {
        let credentials = self.credentials()?;
        let command = FanCommand::GlobalUnlock;

        ilofan_api::with_session(
            &self.inner.connector,
            &credentials,
            async |session: &mut C::Session| -> Result<(), CoreError> {
                run_command(session, command, None).await
            },
        )
        .await?;

        info!(host = credentials.hostname(), "fans returned to automatic control");
        Ok(())
    }

    /// Pin every fan to a percentage of full speed.
    ///
    /// `percentages[i]` applies to fan `i` of the current telemetry. Range
    /// violations are reported before anything touches the network; a
    /// length mismatch is reported after the fan count is fetched and
    /// before a session is opened.
    pub async fn set_fan_speeds(&self, percentages: &[i64]) -> Result<(), CoreError> {
        let request = SpeedRequest::from_percentages(percentages.iter().copied())?;
        self.apply(&request).await
    }

    /// Apply an already validated request.
    ///
    /// Commands go out in fan order over one session. The first failure
    /// stops the sequence; fans before it keep their new speed.
    pub async fn apply(&self, request: &SpeedRequest) -> Result<(), CoreError> {
        log_stage(WriteStage::Validated {
            fans: request.len(),
        });

        let credentials = self.credentials()?;
        let fan_count = self.thermal(&credentials).await?.fans.len();
        request.check_fan_count(fan_count)?;
        log_stage(WriteStage::FanCountConfirmed { fans: fan_count });

        ilofan_api::with_session(
            &self.inner.connector,
            &credentials,
            async |session: &mut C::Session| -> Result<(), CoreError> {
                log_stage(WriteStage::SessionOpen);
                for (index, speed) in request.native_speeds() {
                    run_command(session, FanCommand::Lock { index, speed }, Some(index)).await?;
                    log_stage(WriteStage::Written { index, speed });
                }
                Ok(())
            },
        )
        .await?;

        log_stage(WriteStage::Complete);
        info!(
            host = credentials.hostname(),
            fans = fan_count,
            "fan speeds applied"
        );
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────

    fn credentials(&self) -> Result<Credentials, CoreError> {
        self.inner.resolver.resolve()
    }

    fn redfish(&self, credentials: &Credentials) -> Result<RedfishClient, CoreError> {
        let transport = &self.inner.config.transport;
        let client = match &self.inner.config.redfish_url {
            Some(url) => RedfishClient::with_base_url(credentials, url.clone(), transport)?,
            None => RedfishClient::new(credentials, transport)?,
        };
        Ok(client)
    }

    async fn thermal(&self, credentials: &Credentials) -> Result<Thermal, CoreError> {
        let client = self.redfish(credentials)?;
        debug!(url = %client.base_url(), "fetching thermal telemetry");
        let thermal = client.thermal().await?;
        debug!(
            fans = thermal.fans.len(),
            temperatures = thermal.temperatures.len(),
            "thermal telemetry received"
        );
        Ok(thermal)
    }
}

fn log_stage(stage: WriteStage) {
    debug!(?stage, "fan speed write");
}

/// Run one fan command and turn a failed round trip into `RemoteCommand`.
async fn run_command<S: CommandSession>(
    session: &mut S,
    command: FanCommand,
    index: Option<usize>,
) -> Result<(), CoreError> {
    let line = command.to_string();
    debug!(command = %line, "sending fan command");

    let output = match session.exec(&line).await {
        Ok(output) => output,
        Err(e) if e.is_timeout() => return Err(e.into()),
        Err(e) => {
            return Err(CoreError::RemoteCommand {
                index,
                exit_status: None,
                output: e.to_string(),
            });
        }
    };

    if output.is_success() {
        Ok(())
    } else {
        warn!(command = %line, exit_status = ?output.exit_status, "fan command rejected");
        Err(CoreError::RemoteCommand {
            index,
            exit_status: output.exit_status,
            output: output.text(),
        })
    }
}
