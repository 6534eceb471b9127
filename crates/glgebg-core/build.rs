//! Build script for glgebg-core
//!
//! Handles configuration merging:
//! 1. Start with library defaults
//! 2. If GLGE_CONFIG_RS env var is set, parse the user's config file
//! 3. Merge user values over defaults (user wins)
//! 4. Generate OUT_DIR/glge_merged_config.rs
//!
//! Runtime overrides (GLGE_* env vars) are applied later by
//! `glgebg_runtime::config::BgConfig::from_env`.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration parameter definition
struct ConfigParam {
    name: &'static str,
    rust_type: &'static str,
    default_value: &'static str,
}

/// All configuration parameters with their defaults
const CONFIG_PARAMS: &[ConfigParam] = &[
    ConfigParam {
        name: "VECTOR_MIN_ELEMENTS",
        rust_type: "usize",
        default_value: "4",
    },
    ConfigParam {
        name: "VECTOR_FRONT_MAX_GROWTH",
        rust_type: "usize",
        default_value: "16",
    },
    ConfigParam {
        name: "LOG_LEVEL",
        rust_type: "u8",
        default_value: "3", // info
    },
    ConfigParam {
        name: "FLUSH_EPRINT",
        rust_type: "bool",
        default_value: "false",
    },
    ConfigParam {
        name: "LOGGER_AUTO_PRINT",
        rust_type: "bool",
        default_value: "false",
    },
    ConfigParam {
        name: "PROC_ROOT",
        rust_type: "&str",
        default_value: "\"/proc\"",
    },
];

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("glge_merged_config.rs");

    let mut config: HashMap<&str, String> = CONFIG_PARAMS
        .iter()
        .map(|p| (p.name, p.default_value.to_string()))
        .collect();

    let user_path = env::var("GLGE_CONFIG_RS").ok();
    if let Some(path) = &user_path {
        println!("cargo:rerun-if-changed={}", path);

        match fs::read_to_string(path) {
            Ok(content) => {
                for unknown in parse_and_merge(&content, &mut config) {
                    println!("cargo:warning=Unknown config parameter: {}", unknown);
                }
                println!("cargo:warning=Using custom config: {}", path);
            }
            Err(e) => {
                println!("cargo:warning=Failed to read GLGE_CONFIG_RS ({}): {}", path, e);
            }
        }
    }

    println!("cargo:rerun-if-env-changed=GLGE_CONFIG_RS");

    let output = generate_config(&config, user_path.is_some());
    fs::write(&dest_path, output).expect("Failed to write merged config");
}

/// Parse a user config file and merge known values into `config`.
///
/// Returns the names that did not match any known parameter.
fn parse_and_merge(content: &str, config: &mut HashMap<&str, String>) -> Vec<String> {
    let mut unknown = Vec::new();

    for line in content.lines().map(str::trim) {
        if !line.starts_with("pub const ") {
            continue;
        }

        let Some((name, value)) = parse_const_line(line) else {
            continue;
        };

        match CONFIG_PARAMS.iter().find(|p| p.name == name) {
            Some(param) => {
                config.insert(param.name, value);
            }
            None => unknown.push(name),
        }
    }

    unknown
}

/// Parse `pub const NAME: TYPE = VALUE;` into (NAME, VALUE)
fn parse_const_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("pub const ")?.trim();

    let colon_pos = rest.find(':')?;
    let name = rest[..colon_pos].trim().to_string();

    let eq_pos = rest.find('=')?;
    let semi_pos = rest.rfind(';').unwrap_or(rest.len());
    if semi_pos <= eq_pos {
        return None;
    }

    let value = rest[eq_pos + 1..semi_pos].trim().to_string();
    Some((name, value))
}

fn generate_config(config: &HashMap<&str, String>, has_user_file: bool) -> String {
    let mut output = String::new();

    output.push_str("// Auto-generated by build.rs - do not edit\n");
    output.push_str("// Configuration merged from library defaults");
    if has_user_file {
        output.push_str(" and the file named by GLGE_CONFIG_RS");
    }
    output.push_str("\n\n");

    for param in CONFIG_PARAMS {
        let value = config
            .get(param.name)
            .map(String::as_str)
            .unwrap_or(param.default_value);
        let rust_type = if param.rust_type == "&str" { "&'static str" } else { param.rust_type };
        output.push_str(&format!("pub const {}: {} = {};\n", param.name, rust_type, value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_const_line() {
        let result = parse_const_line("pub const VECTOR_MIN_ELEMENTS: usize = 8;");
        assert_eq!(result, Some(("VECTOR_MIN_ELEMENTS".into(), "8".into())));

        let result = parse_const_line("pub const PROC_ROOT: &str = \"/host/proc\";");
        assert_eq!(result, Some(("PROC_ROOT".into(), "\"/host/proc\"".into())));

        assert_eq!(parse_const_line("pub const BROKEN"), None);
    }

    #[test]
    fn test_parse_and_merge() {
        let mut config: HashMap<&str, String> = HashMap::new();
        config.insert("VECTOR_MIN_ELEMENTS", "4".into());

        let user_config = r#"
            // Custom config
            pub const VECTOR_MIN_ELEMENTS: usize = 32;
            pub const NOT_A_PARAM: u8 = 1;
        "#;

        let unknown = parse_and_merge(user_config, &mut config);

        assert_eq!(config.get("VECTOR_MIN_ELEMENTS"), Some(&"32".to_string()));
        assert_eq!(unknown, vec!["NOT_A_PARAM".to_string()]);
    }
}
