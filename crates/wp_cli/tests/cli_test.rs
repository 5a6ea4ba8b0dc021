use std::process::Command;

fn wpsim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wpsim"))
}

#[test]
fn test_simulate_writes_response() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("match.json");

    let status = wpsim()
        .args(["simulate", "--seed", "7", "--quick", "--referee", "strict", "--output"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("Final: Home"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["seed"], 7);
    assert_eq!(json["final_phase"], "Postgame");
}

#[test]
fn test_same_seed_same_output() {
    let run = || {
        wpsim().args(["simulate", "--seed", "3", "--quick"]).output().unwrap().stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let printed = wpsim().args(["default-config", "--quick"]).output().unwrap();
    assert!(printed.status.success());
    std::fs::write(&path, &printed.stdout).unwrap();

    let run = wpsim().args(["simulate", "--seed", "1", "--config"]).arg(&path).output().unwrap();
    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
}

#[test]
fn test_unknown_preset_fails() {
    let run = wpsim().args(["simulate", "--quick", "--referee", "blind"]).output().unwrap();
    assert!(!run.status.success());
    assert!(String::from_utf8_lossy(&run.stderr).contains("blind"));
}

#[test]
fn test_presets_listed() {
    let run = wpsim().arg("presets").output().unwrap();
    let stdout = String::from_utf8_lossy(&run.stdout);
    for name in ["balanced", "strict", "lenient", "advantage_minded", "erratic"] {
        assert!(stdout.contains(name), "missing {}", name);
    }
}
