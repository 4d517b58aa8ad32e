use std::env;
use std::fs;
use std::path::Path;

/// Claves que `config.rs` lee con `option_env!`
const CONFIG_KEYS: &[&str] = &[
    "GOOGLE_MAPS_API_KEY",
    "LOG_LEVEL",
    "DEFAULT_MAP_CENTER_LAT",
    "DEFAULT_MAP_CENTER_LNG",
    "DEFAULT_MAP_ZOOM",
    "SCRIPT_POLL_INTERVAL_MS",
    "SCRIPT_TIMEOUT_MS",
    "CONTAINER_RETRY_MS",
    "MAP_INIT_DELAY_MS",
    "MARKER_BOUNCE_MS",
    "MAX_FIT_ZOOM",
    "SELECTED_VENDOR_ZOOM",
    "USER_LOCATION_ZOOM",
    "DISCOVER_MAX_DISTANCE",
];

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for (key, value) in contents.lines().filter_map(parse_env_line) {
                if !CONFIG_KEYS.contains(&key) {
                    println!("cargo:warning=Clave desconocida en .env: {}", key);
                    continue;
                }
                // Una variable del entorno real tiene prioridad sobre .env
                if env::var(key).is_err() {
                    println!("cargo:rustc-env={}={}", key, value);
                }
            }
        }
    } else {
        println!("cargo:warning=No se encontró .env, se usan valores por defecto (ver .env.example). El mapa necesita GOOGLE_MAPS_API_KEY.");
    }

    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}

/// Parsear una línea KEY=VALUE (ignora comentarios, líneas vacías y comillas)
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let value = value.trim().trim_matches('"');
    Some((key.trim(), value))
}
