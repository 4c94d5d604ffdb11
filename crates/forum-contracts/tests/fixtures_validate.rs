use anyhow::{bail, Context, Result};
use forum_contracts::ContractKind;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir(kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(kind)
        .canonicalize()
        .expect("fixtures directory to resolve")
}

/// Fixture files are named `<contract>.<label>.json`.
fn load_fixtures(dir: &Path) -> Result<Vec<(PathBuf, ContractKind, Value)>> {
    let mut out = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading fixtures directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry inside {}", dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let contract = stem.split('.').next().unwrap_or_default();
        let kind: ContractKind = match contract.parse() {
            Ok(kind) => kind,
            Err(err) => bail!("{}: {err}", path.display()),
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing fixture JSON {}", path.display()))?;
        out.push((path, kind, value));
    }
    Ok(out)
}

#[test]
fn valid_fixtures_pass_their_contract() -> Result<()> {
    let fixtures = load_fixtures(&fixtures_dir("valid"))?;
    if fixtures.is_empty() {
        bail!("no valid fixtures found");
    }
    for (path, kind, value) in fixtures {
        let issues = kind.check(&value);
        if !issues.is_empty() {
            let collected: Vec<_> = issues.iter().map(ToString::to_string).collect();
            bail!(
                "{} failed {kind}:\n  - {}",
                path.display(),
                collected.join("\n  - ")
            );
        }
        let encoded = kind
            .round_trip(&value)
            .with_context(|| format!("re-encoding {}", path.display()))?;
        if encoded != value {
            bail!(
                "{} changed after decoding as {kind}:\n  sent {value}\n  got  {encoded}",
                path.display()
            );
        }
    }
    Ok(())
}

#[test]
fn invalid_fixtures_are_rejected() -> Result<()> {
    let fixtures = load_fixtures(&fixtures_dir("invalid"))?;
    if fixtures.is_empty() {
        bail!("no invalid fixtures found");
    }
    for (path, kind, value) in fixtures {
        if kind.check(&value).is_empty() {
            bail!("{} unexpectedly satisfied {kind}", path.display());
        }
    }
    Ok(())
}
