//! Integration tests for the `foldbox` binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn foldbox_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_foldbox"))
}

/// Write the default config to `dir` so runs do not depend on the user's
/// own config file.
fn isolated_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let status = foldbox_bin()
        .args(["config", "init"])
        .arg(&path)
        .status()
        .expect("failed to run foldbox config init");
    assert!(status.success());
    path
}

// ---------------------------------------------------------------------------
// Informational commands
// ---------------------------------------------------------------------------

#[test]
fn cli_curves_prints_default_range() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(temp.path());
    let output = foldbox_bin()
        .args(["curves", "--steps", "2", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run foldbox curves");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cutoff Hz"));
    assert!(stdout.contains("600.0"), "midpoint cutoff missing:\n{stdout}");
    assert!(stdout.contains("18000.0"));
}

#[test]
fn cli_curves_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(temp.path());
    let output = foldbox_bin()
        .args(["curves", "--json", "--steps", "4", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["raw"], 0.0);
}

#[test]
fn cli_patches_lists_factory_set() {
    let output = foldbox_bin().args(["patches", "list"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["init", "pluck", "fold_lead", "sub_bass", "acid", "ambient_keys"] {
        assert!(stdout.contains(id), "missing {id}");
    }
}

#[test]
fn cli_patches_show_prints_toml() {
    let output = foldbox_bin()
        .args(["patches", "show", "fold_lead"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let patch = foldbox_config::Patch::from_toml(&stdout).unwrap();
    assert_eq!(patch.name, "Fold Lead");
    assert_eq!(patch.fold, 0.65);
}

#[test]
fn cli_unknown_patch_fails() {
    let output = foldbox_bin()
        .args(["patches", "show", "no_such_patch_anywhere"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("patch not found"));
}

#[test]
fn cli_config_init_then_check() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(temp.path());
    assert!(fs::read_to_string(&config).unwrap().contains("polyphony = 4"));

    let output = foldbox_bin()
        .args(["config", "check"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    fs::write(&config, "polyphony = 3\n").unwrap();
    let output = foldbox_bin()
        .args(["config", "check"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("polyphony"));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn cli_render_writes_expected_length() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(temp.path());
    let score = temp.path().join("score.txt");
    let wav = temp.path().join("out.wav");
    fs::write(
        &score,
        "# two notes\n0.0 on 57\n0.05 on 64 90\n0.1 cc 4 100\n0.2 off 57\n0.2 off 64\n",
    )
    .unwrap();

    let output = foldbox_bin()
        .arg("render")
        .arg(&score)
        .arg(&wav)
        .args(["--quiet", "--tail", "0.3", "--stereo", "--patch", "pluck", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let info = foldbox_io::read_wav_info(&wav).unwrap();
    assert_eq!(info.spec.channels, 2);
    assert_eq!(info.spec.sample_rate, 48000);
    assert_eq!(info.num_frames, 24000);

    let (samples, _) = foldbox_io::read_wav(&wav).unwrap();
    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.01, "render is silent");
    assert!(samples.iter().all(|s| s.is_finite()));
}

#[test]
fn cli_render_overrides_polyphony() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(temp.path());
    let score = temp.path().join("score.txt");
    fs::write(&score, "0 on 60\n0.1 off 60\n").unwrap();

    for n in ["1", "8"] {
        let wav = temp.path().join(format!("poly{n}.wav"));
        let output = foldbox_bin()
            .arg("render")
            .arg(&score)
            .arg(&wav)
            .args(["--quiet", "--tail", "0.1", "--polyphony", n, "--config"])
            .arg(&config)
            .output()
            .unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains(&format!("{n} voice(s)")));
    }
}

#[test]
fn cli_render_reports_score_line() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(temp.path());
    let score = temp.path().join("bad.txt");
    fs::write(&score, "0 on 60\n0.5 wobble 3\n").unwrap();

    let output = foldbox_bin()
        .arg("render")
        .arg(&score)
        .arg(temp.path().join("never.wav"))
        .args(["--quiet", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}
