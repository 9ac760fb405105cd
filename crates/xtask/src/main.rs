use anyhow::Context;
use std::path::{Path, PathBuf};

/// Crates the domain crate must never depend on: it stays a pure state machine.
const DOMAIN_FORBIDDEN: &[&str] = &[
    "tokio",
    "reqwest",
    "async-trait",
    "futures-util",
    "tracing",
    "storefront-shared",
    "storefront-checkout",
];

/// The wire crate only needs serde.
const SHARED_ALLOWED: &[&str] = &["serde", "serde_json"];

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let packages = metadata["packages"]
        .as_array()
        .context("cargo metadata has no packages")?;

    let mut violations = Vec::new();
    for package in packages {
        let name = package["name"].as_str().unwrap_or_default();
        let deps = normal_dependencies(package);
        violations.extend(dependency_violations(name, &deps));

        if name == "storefront-domain" {
            let manifest = package["manifest_path"].as_str().unwrap_or_default();
            let src = Path::new(manifest)
                .parent()
                .map(|dir| dir.join("src"))
                .unwrap_or_default();
            violations.extend(source_violations(&src)?);
        }
    }

    if violations.is_empty() {
        println!("arch-check: ok");
        Ok(())
    } else {
        for violation in &violations {
            eprintln!("arch-check: {violation}");
        }
        anyhow::bail!("{} architecture violation(s)", violations.len())
    }
}

/// Names of the non-dev dependencies of a metadata package entry.
fn normal_dependencies(package: &serde_json::Value) -> Vec<String> {
    package["dependencies"]
        .as_array()
        .map(|deps| {
            deps.iter()
                .filter(|dep| dep["kind"].is_null())
                .filter_map(|dep| dep["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn dependency_violations(package: &str, deps: &[String]) -> Vec<String> {
    match package {
        "storefront-domain" => deps
            .iter()
            .filter(|dep| DOMAIN_FORBIDDEN.contains(&dep.as_str()))
            .map(|dep| format!("{package} must not depend on {dep}"))
            .collect(),
        "storefront-shared" => deps
            .iter()
            .filter(|dep| !SHARED_ALLOWED.contains(&dep.as_str()))
            .map(|dep| format!("{package} may only depend on serde crates, found {dep}"))
            .collect(),
        _ => Vec::new(),
    }
}

/// Domain sources must not reach for runtime or I/O crates even through
/// re-exports.
fn source_violations(src: &Path) -> anyhow::Result<Vec<String>> {
    let pattern = regex_lite::Regex::new(r"\b(tokio|reqwest|async_trait|futures_util)::")
        .context("compiling source pattern")?;

    let mut violations = Vec::new();
    for file in rust_files(src)? {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        for (index, line) in content.lines().enumerate() {
            if let Some(found) = pattern.find(line) {
                violations.push(format!(
                    "{}:{} uses {}",
                    file.display(),
                    index + 1,
                    found.as_str().trim_end_matches("::")
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in
            std::fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
