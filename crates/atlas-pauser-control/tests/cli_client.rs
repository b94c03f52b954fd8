//! `mongocli` client tests against a fake `mongocli` shell script.
//!
//! All scenarios share one script and run sequentially in a single test so
//! the script is never executed while another test is still writing one.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use atlas_pauser_control::{
    Action, AtlasClient, CliAtlasClient, ClusterPauser, Command, Credentials, ErrorKind,
    PauserConfig, PauserError, Transport,
};
use tempfile::TempDir;

const FAKE_MONGOCLI: &str = r#"#!/bin/sh
if [ "$MCLI_PUBLIC_API_KEY" != "pub" ] || [ "$MCLI_PRIVATE_API_KEY" != "priv" ]; then
  echo "Error: missing API keys" >&2
  exit 1
fi
case "$1 $2 $3" in
  "iam projects list")
    echo '{"links":[],"results":[{"name":"dev0-document-service0","orgId":"org1","id":"p123"},{"name":"dup","orgId":"org1","id":"p1"},{"name":"dup","orgId":"org2","id":"p2"}],"totalCount":3}'
    ;;
  "atlas cluster pause")
    case "$4" in
      paused0)
        echo "Error: PATCH https://cloud.mongodb.com/api/atlas/v1.0/groups/$MCLI_PROJECT_ID/clusters/$4: HTTP 409 (Error code: \"CANNOT_UPDATE_PAUSED_CLUSTER\") Detail: Cluster is paused." >&2
        exit 1
        ;;
      cooling0)
        echo "Error: https://cloud.mongodb.com/api/atlas/v1.0/groups/$MCLI_PROJECT_ID/clusters/$4 PATCH: 400 (request \"CANNOT_PAUSE_RECENTLY_RESUMED_CLUSTER\") Resumed recently." >&2
        exit 1
        ;;
      *)
        echo "{\"name\":\"$4\",\"paused\":true,\"groupId\":\"$MCLI_PROJECT_ID\",\"orgId\":\"$MCLI_ORG_ID\"}"
        ;;
    esac
    ;;
  "atlas cluster start")
    echo "{\"name\":\"$4\",\"paused\":false,\"groupId\":\"$MCLI_PROJECT_ID\"}"
    ;;
  *)
    echo "Error: unknown command $*" >&2
    exit 2
    ;;
esac
"#;

fn install_fake(dir: &TempDir) -> PathBuf {
    let script = dir.path().join("mongocli");
    std::fs::write(&script, FAKE_MONGOCLI).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn command(action: Action, cluster: &str) -> Command {
    Command::new(action, "dev0-document-service0", cluster)
}

#[tokio::test]
async fn fake_mongocli_scenarios() {
    let dir = TempDir::new().unwrap();
    let script = install_fake(&dir);

    let mut config = PauserConfig::new(Credentials::new("pub", "priv")).with_transport(Transport::Cli);
    config.mongocli_path = script.clone();
    let pauser = ClusterPauser::new(config.build_client().unwrap());

    // Projects are listed from mongocli's JSON output.
    let client = CliAtlasClient::new(&script, Credentials::new("pub", "priv"));
    let projects = client.list_projects().await.unwrap();
    assert_eq!(projects.len(), 3);
    assert_eq!(projects[0].id.as_str(), "p123");

    // Pause receives the resolved project and org ids.
    let outcome = pauser.dispatch(&command(Action::Pause, "cluster0")).await.unwrap();
    assert!(outcome.body.contains(r#""groupId":"p123""#));
    assert!(outcome.body.contains(r#""orgId":"org1""#));

    // Start on a running cluster succeeds.
    let outcome = pauser.dispatch(&command(Action::Start, "cluster0")).await.unwrap();
    assert!(outcome.body.contains(r#""paused":false"#));

    // Conflicts classify the same way as over HTTP.
    let err = pauser
        .dispatch(&command(Action::Pause, "paused0"))
        .await
        .unwrap_err();
    assert!(matches!(err, PauserError::AlreadyPaused { .. }));
    assert!(err.to_string().contains("CANNOT_UPDATE_PAUSED_CLUSTER"));

    let err = pauser
        .dispatch(&command(Action::Pause, "cooling0"))
        .await
        .unwrap_err();
    assert!(matches!(err, PauserError::PauseCooldown { .. }));
    assert_eq!(err.kind(), ErrorKind::Action);

    // Ambiguous names fail before any cluster call.
    let err = pauser
        .dispatch(&Command::new(Action::Pause, "dup", "cluster0"))
        .await
        .unwrap_err();
    assert!(matches!(err, PauserError::AmbiguousProject { count: 2, .. }));

    // Bad keys surface the mongocli message as a generic remote failure.
    let wrong: Arc<dyn AtlasClient> =
        Arc::new(CliAtlasClient::new(&script, Credentials::new("pub", "nope")));
    let err = wrong.list_projects().await.unwrap_err();
    match err {
        PauserError::Remote { status, message } => {
            assert_eq!(status, None);
            assert_eq!(message, "Error: missing API keys");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
