#![allow(clippy::unwrap_used)]
// Integration tests for `FanController`: Redfish telemetry via wiremock,
// command channel via an in-memory connector.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ilofan_api::{CommandOutput, CommandSession, SessionConnector};
use ilofan_core::{
    ControllerConfig, CoreError, Credentials, FanController, FanReading, FanState, Health,
    Violation,
};

// ── Scripted command channel ────────────────────────────────────────

#[derive(Default)]
struct Script {
    connects: AtomicUsize,
    closes: AtomicUsize,
    commands: Mutex<Vec<String>>,
    /// Command position that answers with exit status 1.
    reject_at: Option<usize>,
    /// Command position whose transport fails outright.
    drop_at: Option<usize>,
    /// Command position that never answers within the session timeout.
    stall_at: Option<usize>,
}

impl Script {
    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

struct ScriptedSession(Arc<Script>);

impl CommandSession for ScriptedSession {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput, ilofan_api::Error> {
        let position = {
            let mut commands = self.0.commands.lock().unwrap();
            commands.push(command.to_owned());
            commands.len() - 1
        };

        if self.0.drop_at == Some(position) {
            return Err(ilofan_api::Error::Connect {
                host: "10.0.0.5".into(),
                reason: "channel closed".into(),
            });
        }
        if self.0.stall_at == Some(position) {
            return Err(ilofan_api::Error::Timeout { timeout_secs: 30 });
        }
        if self.0.reject_at == Some(position) {
            return Ok(CommandOutput {
                stdout: "status=2\nstatus_tag=COMMAND PROCESSING FAILED".into(),
                stderr: String::new(),
                exit_status: Some(1),
            });
        }
        Ok(CommandOutput {
            stdout: "status=0".into(),
            stderr: String::new(),
            exit_status: Some(0),
        })
    }

    async fn close(self) -> Result<(), ilofan_api::Error> {
        self.0.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct ScriptedConnector(Arc<Script>);

impl SessionConnector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn connect(&self, _: &Credentials) -> Result<ScriptedSession, ilofan_api::Error> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession(Arc::clone(&self.0)))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

const THERMAL_PATH: &str = "/redfish/v1/chassis/1/Thermal";

fn credentials() -> Credentials {
    Credentials::new(
        "10.0.0.5",
        "Administrator",
        SecretString::from("s3cret".to_owned()),
    )
}

fn thermal_body() -> Value {
    json!({
        "@odata.type": "#Thermal.v1_1_0.Thermal",
        "Fans": [
            {
                "FanName": "Fan 1",
                "CurrentReading": 19,
                "Oem": { "Hp": { "Location": "System" } },
                "Status": { "Health": "OK", "State": "Enabled" },
                "Units": "Percent"
            },
            {
                "FanName": "Fan 2",
                "CurrentReading": 25,
                "Oem": { "Hp": { "Location": "System" } },
                "Status": { "Health": "OK", "State": "Enabled" },
                "Units": "Percent"
            }
        ],
        "Temperatures": [
            {
                "Name": "01-Inlet Ambient",
                "ReadingCelsius": 21,
                "UpperThresholdCritical": 42,
                "PhysicalContext": "Intake",
                "Status": { "Health": "OK", "State": "Enabled" }
            }
        ]
    })
}

async fn setup(script: Script) -> (MockServer, FanController<ScriptedConnector>, Arc<Script>) {
    let server = MockServer::start().await;
    let config = ControllerConfig {
        redfish_url: Some(Url::parse(&format!("{}/", server.uri())).unwrap()),
        ..ControllerConfig::default()
    };
    let script = Arc::new(script);
    let controller = FanController::with_connector(
        config,
        Arc::new(|| Ok::<_, CoreError>(credentials())),
        ScriptedConnector(Arc::clone(&script)),
    );
    (server, controller, script)
}

async fn mount_thermal(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(THERMAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Telemetry ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_fans_in_controller_order() {
    let (server, controller, _) = setup(Script::default()).await;
    mount_thermal(&server, thermal_body()).await;

    let fans = controller.fetch_fans().await.unwrap();

    let expected = |name: &str, current_value| FanReading {
        name: name.into(),
        current_value,
        health: Health::Ok,
        state: FanState::Enabled,
        location: "System".into(),
    };
    assert_eq!(fans, vec![expected("Fan 1", 19), expected("Fan 2", 25)]);
}

#[tokio::test]
async fn test_fetch_temperatures() {
    let (server, controller, _) = setup(Script::default()).await;
    mount_thermal(&server, thermal_body()).await;

    let temps = controller.fetch_temperatures().await.unwrap();

    assert_eq!(temps.len(), 1);
    assert_eq!(temps[0].name, "01-Inlet Ambient");
    assert_eq!(temps[0].reading_celsius, Some(21));
    assert_eq!(temps[0].upper_critical_celsius, Some(42));
}

#[tokio::test]
async fn test_fetch_fans_server_error() {
    let (server, controller, _) = setup(Script::default()).await;
    Mock::given(method("GET"))
        .and(path(THERMAL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = controller.fetch_fans().await;

    assert!(
        matches!(result, Err(CoreError::Remote { status: 500 })),
        "expected Remote 500, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_credentials_skip_network() {
    let server = MockServer::start().await;
    let script = Arc::new(Script::default());
    let config = ControllerConfig {
        redfish_url: Some(Url::parse(&server.uri()).unwrap()),
        ..ControllerConfig::default()
    };
    let controller = FanController::with_connector(
        config,
        Arc::new(|| {
            Err::<Credentials, _>(CoreError::MissingConfig {
                names: vec!["ILO_HOST".into(), "ILO_PASSWORD".into()],
            })
        }),
        ScriptedConnector(Arc::clone(&script)),
    );

    let result = controller.set_fan_speeds(&[50, 50]).await;

    match result {
        Err(CoreError::MissingConfig { names }) => {
            assert_eq!(names, vec!["ILO_HOST", "ILO_PASSWORD"]);
        }
        other => panic!("expected MissingConfig, got: {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(script.connects.load(Ordering::SeqCst), 0);
}

// ── Speed writes ────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_speeds_sends_one_command_per_fan() {
    let (server, controller, script) = setup(Script::default()).await;
    mount_thermal(&server, thermal_body()).await;

    controller.set_fan_speeds(&[32, 32]).await.unwrap();

    assert_eq!(script.commands(), vec!["fan p 0 lock 82", "fan p 1 lock 82"]);
    assert_eq!(script.connects.load(Ordering::SeqCst), 1);
    assert_eq!(script.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_speeds_stops_at_first_rejection() {
    let fans: Vec<Value> = (1..=3)
        .map(|n| json!({ "FanName": format!("Fan {n}"), "CurrentReading": 20 }))
        .collect();
    let (server, controller, script) = setup(Script {
        reject_at: Some(1),
        ..Script::default()
    })
    .await;
    mount_thermal(&server, json!({ "Fans": fans })).await;

    let result = controller.set_fan_speeds(&[10, 50, 100]).await;

    match result {
        Err(CoreError::RemoteCommand {
            index, exit_status, ..
        }) => {
            assert_eq!(index, Some(1));
            assert_eq!(exit_status, Some(1));
        }
        other => panic!("expected RemoteCommand, got: {other:?}"),
    }
    assert_eq!(script.commands(), vec!["fan p 0 lock 26", "fan p 1 lock 128"]);
    assert_eq!(script.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_speeds_transport_failure_names_fan() {
    let (server, controller, script) = setup(Script {
        drop_at: Some(0),
        ..Script::default()
    })
    .await;
    mount_thermal(&server, thermal_body()).await;

    let result = controller.set_fan_speeds(&[40, 40]).await;

    assert!(
        matches!(
            result,
            Err(CoreError::RemoteCommand {
                index: Some(0),
                exit_status: None,
                ..
            })
        ),
        "expected RemoteCommand for fan 0, got: {result:?}"
    );
    assert_eq!(script.commands().len(), 1);
    assert_eq!(script.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_speeds_timeout_stays_a_timeout() {
    let (server, controller, script) = setup(Script {
        stall_at: Some(1),
        ..Script::default()
    })
    .await;
    mount_thermal(&server, thermal_body()).await;

    let result = controller.set_fan_speeds(&[40, 40]).await;

    assert!(
        matches!(result, Err(CoreError::Timeout { timeout_secs: 30 })),
        "expected Timeout, got: {result:?}"
    );
    assert_eq!(script.commands(), vec!["fan p 0 lock 102", "fan p 1 lock 102"]);
    assert_eq!(script.connects.load(Ordering::SeqCst), 1);
    assert_eq!(script.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_set_speeds_length_mismatch_opens_no_session() {
    let (server, controller, script) = setup(Script::default()).await;
    mount_thermal(&server, thermal_body()).await;

    let result = controller.set_fan_speeds(&[50, 50, 50]).await;

    match result {
        Err(CoreError::Validation { violations }) => assert_eq!(
            violations,
            vec![Violation::LengthMismatch {
                expected: 2,
                actual: 3,
            }]
        ),
        other => panic!("expected Validation, got: {other:?}"),
    }
    assert_eq!(script.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_set_speeds_range_checked_before_network() {
    let (server, controller, script) = setup(Script::default()).await;
    mount_thermal(&server, thermal_body()).await;

    let result = controller.set_fan_speeds(&[5, 101]).await;

    match result {
        Err(CoreError::Validation { violations }) => assert_eq!(
            violations,
            vec![
                Violation::OutOfRange { index: 0, value: 5 },
                Violation::OutOfRange {
                    index: 1,
                    value: 101,
                },
            ]
        ),
        other => panic!("expected Validation, got: {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(script.connects.load(Ordering::SeqCst), 0);
}

// ── Unlock ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unlock_sends_global_unlock() {
    let (server, controller, script) = setup(Script::default()).await;

    controller.unlock_fans().await.unwrap();

    assert_eq!(script.commands(), vec!["fan p global unlock"]);
    assert_eq!(script.closes.load(Ordering::SeqCst), 1);
    // Unlock never needs telemetry.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unlock_rejected() {
    let (_server, controller, script) = setup(Script {
        reject_at: Some(0),
        ..Script::default()
    })
    .await;

    let result = controller.unlock_fans().await;

    assert!(
        matches!(
            result,
            Err(CoreError::RemoteCommand {
                index: None,
                exit_status: Some(1),
                ..
            })
        ),
        "expected global RemoteCommand, got: {result:?}"
    );
    assert_eq!(script.closes.load(Ordering::SeqCst), 1);
}
