//! Build script for obol-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates ticker.toml at compile time
//! - Checks that the CYW43 firmware blobs are in place

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Blobs shipped with the embassy repository (cyw43-firmware/)
const CYW43_BLOBS: [&str; 2] = ["43439A0.bin", "43439A0_clm.bin"];

const MAX_ACCOUNTS: usize = 8;

fn main() {
    setup_linker();
    validate_config();
    check_cyw43_firmware();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| format!("║  • {:<62} ║", line))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Validate ticker.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=ticker.toml");

    let config_path = Path::new("ticker.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read ticker.toml", &[e.to_string()]),
    };

    let config: toml::Table = match content.parse() {
        Ok(table) => table,
        Err(e) => {
            let lines: Vec<String> = e
                .to_string()
                .lines()
                .map(|line| line.chars().take(62).collect())
                .collect();
            fail("Invalid TOML syntax in ticker.toml", &lines);
        }
    };

    let mut errors = Vec::new();
    validate_endpoint(&config, &mut errors);
    validate_quote(&config, &mut errors);
    validate_polling(&config, &mut errors);
    validate_alert(&config, &mut errors);
    validate_portfolio(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid settings in ticker.toml", &errors);
    }

    println!("cargo:warning=ticker.toml validated successfully");
}

fn section<'a>(config: &'a toml::Table, name: &str) -> Option<&'a toml::Table> {
    config.get(name).and_then(|v| v.as_table())
}

fn validate_endpoint(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(endpoint) = section(config, "endpoint") else {
        return;
    };
    if let Some(host) = endpoint.get("host") {
        if host.as_str().map_or(true, str::is_empty) {
            errors.push("[endpoint] host must be a non-empty string".into());
        }
    }
    if let Some(port) = endpoint.get("port") {
        if !port.as_integer().is_some_and(|p| (1..=65535).contains(&p)) {
            errors.push("[endpoint] port must be 1-65535".into());
        }
    }
}

fn validate_quote(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(quote) = section(config, "quote") else {
        return;
    };
    if let Some(decimals) = quote.get("decimals") {
        if !decimals.as_integer().is_some_and(|d| (0..=8).contains(&d)) {
            errors.push("[quote] decimals must be 0-8".into());
        }
    }
    if let Some(issuer) = quote.get("issuer") {
        if !issuer.as_str().is_some_and(is_classic_address) {
            errors.push("[quote] issuer is not a classic address".into());
        }
    }
}

fn validate_polling(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(polling) = section(config, "polling") else {
        return;
    };
    for (key, value) in polling {
        if !value.as_integer().is_some_and(|ms| ms > 0) {
            errors.push(format!("[polling] {} must be a positive integer", key));
        }
    }
}

fn validate_alert(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(alert) = section(config, "alert") else {
        return;
    };
    if let Some(threshold) = alert.get("threshold_percent") {
        let value = threshold
            .as_float()
            .or_else(|| threshold.as_integer().map(|i| i as f64));
        if !value.is_some_and(|t| t > 0.0) {
            errors.push("[alert] threshold_percent must be positive".into());
        }
    }
}

fn validate_portfolio(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(accounts) = section(config, "portfolio")
        .and_then(|p| p.get("accounts"))
        .and_then(|a| a.as_array())
    else {
        return;
    };
    if accounts.len() > MAX_ACCOUNTS {
        errors.push(format!("[portfolio] at most {} accounts", MAX_ACCOUNTS));
    }
    for account in accounts {
        match account.as_str() {
            Some(a) if is_classic_address(a) => {}
            Some(a) => errors.push(format!("[portfolio] bad address {}", a)),
            None => errors.push("[portfolio] accounts must be strings".into()),
        }
    }
}

fn is_classic_address(s: &str) -> bool {
    s.starts_with('r') && (25..=35).contains(&s.len())
}

/// The CYW43 blobs are not redistributed with this crate
fn check_cyw43_firmware() {
    let dir = Path::new("cyw43-firmware");
    println!("cargo:rerun-if-changed=cyw43-firmware");

    let missing: Vec<String> = CYW43_BLOBS
        .iter()
        .filter(|blob| !dir.join(blob).exists())
        .map(|blob| format!("cyw43-firmware/{} not found", blob))
        .collect();

    if !missing.is_empty() {
        let mut lines = missing;
        lines.push("Copy them from embassy-rs/embassy cyw43-firmware/".into());
        fail("Missing CYW43 firmware", &lines);
    }
}
