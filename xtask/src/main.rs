//! Developer tasks (schema generation, fixture conformance, pack checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use releasegate_domain::{CompiledPack, RoutingConfig};
use releasegate_test_util::normalize_nondeterministic;
use releasegate_types::{Channel, DraftContext, DraftSubmission, Evaluation};
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn draft_fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures").join("drafts")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_packet_schema() -> schemars::Schema {
    schema_for!(releasegate_types::ApprovalPacket)
}

fn generate_evaluation_schema() -> schemars::Schema {
    schema_for!(releasegate_types::Evaluation)
}

fn generate_policy_pack_schema() -> schemars::Schema {
    schema_for!(releasegate_types::PolicyPack)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(releasegate_settings::ReleasegateConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "releasegate.packet.v1.json",
            generate: generate_packet_schema,
        },
        SchemaSpec {
            filename: "releasegate.evaluation.v1.json",
            generate: generate_evaluation_schema,
        },
        SchemaSpec {
            filename: "releasegate.policy-pack.v1.json",
            generate: generate_policy_pack_schema,
        },
        SchemaSpec {
            filename: "releasegate.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Evaluate draft fixtures and check expected outcomes");
    eprintln!("  pack-coverage     Check built-in packs compile and every rule is described");
}

/// Evaluate a draft the way the CLI does, minus rewrite suggestions.
fn evaluate_fixture(
    pack: &CompiledPack,
    text: &str,
    channel: Channel,
    now: OffsetDateTime,
) -> Evaluation {
    let submission = DraftSubmission {
        text: text.trim().to_string(),
        context: DraftContext {
            channel,
            product: None,
            audience: None,
        },
    };
    let result = releasegate_domain::evaluate(&submission, pack);
    let routed = releasegate_domain::route(&result, &RoutingConfig::default());
    releasegate_domain::assemble(result, now, routed)
}

/// Compare an evaluation against the subset recorded in `expected.json`.
fn compare_expected(actual: &Value, expected: &Value) -> Vec<String> {
    let mut diffs = Vec::new();

    for key in ["decision", "severity", "abstained", "requiredDisclosures"] {
        if actual[key] != expected[key] {
            diffs.push(format!("{key}: got {}, expected {}", actual[key], expected[key]));
        }
    }
    if actual["confidence"]["score"].as_f64() != expected["confidence"].as_f64() {
        diffs.push(format!(
            "confidence: got {}, expected {}",
            actual["confidence"]["score"], expected["confidence"]
        ));
    }
    let fired: Vec<Value> = actual["violations"]
        .as_array()
        .map(|vs| vs.iter().map(|v| v["ruleId"].clone()).collect())
        .unwrap_or_default();
    if Value::Array(fired.clone()) != expected["firedRuleIds"] {
        diffs.push(format!(
            "firedRuleIds: got {:?}, expected {}",
            fired, expected["firedRuleIds"]
        ));
    }
    diffs
}

/// Fixture conformance.
///
/// For every `tests/fixtures/drafts/<name>/`:
/// 1. Evaluate `draft.txt` against the default built-in pack
/// 2. Validate the output against the evaluation schema
/// 3. Compare the outcome with `expected.json`
/// 4. Re-evaluate later and check only timestamps differ
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_evaluation_schema())
        .context("Failed to serialize evaluation schema")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;
    println!("✓ releasegate.evaluation.v1 schema compiles");

    let pack = releasegate_settings::builtin_pack("generic.v0.1")?;
    let compiled = CompiledPack::compile(&pack).context("Failed to compile built-in pack")?;

    let fixtures_dir = draft_fixtures_dir();
    if !fixtures_dir.exists() {
        bail!("tests/fixtures/drafts/ not found at {}", fixtures_dir.display());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(&fixtures_dir)
        .context("Failed to read tests/fixtures/drafts/")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    entries.sort();

    let mut errors = Vec::new();
    for fixture_dir in &entries {
        let name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let text = fs::read_to_string(fixture_dir.join("draft.txt"))
            .with_context(|| format!("fixture '{}': read draft.txt", name))?;
        let expected: Value = serde_json::from_str(
            &fs::read_to_string(fixture_dir.join("expected.json"))
                .with_context(|| format!("fixture '{}': read expected.json", name))?,
        )
        .with_context(|| format!("fixture '{}': parse expected.json", name))?;

        let channel = match expected["channel"].as_str().unwrap_or("email").parse::<Channel>() {
            Ok(channel) => channel,
            Err(err) => {
                errors.push(format!("fixture '{}': {}", name, err));
                continue;
            }
        };

        let first = evaluate_fixture(&compiled, &text, channel, OffsetDateTime::now_utc());
        let second = evaluate_fixture(
            &compiled,
            &text,
            channel,
            OffsetDateTime::now_utc() + time::Duration::hours(1),
        );
        let first = serde_json::to_value(&first)?;
        let second = serde_json::to_value(&second)?;

        for err in validator.iter_errors(&first) {
            errors.push(format!("fixture '{}': schema validation: {}", name, err));
        }
        for diff in compare_expected(&first, &expected) {
            errors.push(format!("fixture '{}': {}", name, diff));
        }
        if normalize_nondeterministic(first) != normalize_nondeterministic(second) {
            errors.push(format!("fixture '{}': evaluation is not deterministic", name));
        }

        println!("  ✓ fixture '{}' evaluated", name);
    }

    if entries.is_empty() {
        bail!("No draft fixtures found in {}", fixtures_dir.display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} draft fixtures pass conformance checks!", entries.len());
    Ok(())
}

/// Every built-in pack compiles and every rule carries a description and message.
fn pack_coverage() -> anyhow::Result<()> {
    let mut errors = Vec::new();
    let names = releasegate_settings::builtin_pack_names();

    for name in names {
        let pack = releasegate_settings::builtin_pack(name)?;
        if let Err(err) = CompiledPack::compile(&pack) {
            errors.push(format!("pack '{}': {}", name, err));
            continue;
        }
        for rule in &pack.rules {
            if rule.description.as_deref().is_none_or(str::is_empty) {
                errors.push(format!("pack '{}': rule '{}' has no description", name, rule.id));
            }
            if rule.message.is_empty() {
                errors.push(format!("pack '{}': rule '{}' has empty message", name, rule.id));
            }
        }
        println!("✓ pack '{}' ({}): {} rules", name, pack.policy_version, pack.rules.len());
    }

    if errors.is_empty() {
        println!("\n✓ All pack coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Pack coverage failed with {} errors", errors.len())
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "pack-coverage" => pack_coverage(),
        "print-schema-ids" => {
            println!("{}", releasegate_types::SCHEMA_PACKET_V1);
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
