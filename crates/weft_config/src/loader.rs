//! Configuration file loading and validation.

use crate::build::BuildConfiguration;
use crate::error::ConfigError;
use crate::types::{BuildSettings, ProjectConfig, SettingsFile};
use std::path::Path;

/// Name of the optional settings file looked up next to the project file.
pub const SETTINGS_FILE: &str = "weft.toml";

/// Loads and validates a project file (JSON with comments).
pub fn load_project(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_project_from_str(&content)
}

/// Parses and validates a project file from a string.
pub fn load_project_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let stripped = strip_json_comments(content);
    let config: ProjectConfig =
        serde_json::from_str(&stripped).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_project(&config)?;
    Ok(config)
}

/// Loads `weft.toml` from `dir`, falling back to defaults when it does not exist.
pub fn load_settings(dir: &Path) -> Result<BuildSettings, ConfigError> {
    let path = dir.join(SETTINGS_FILE);
    if !path.is_file() {
        return Ok(BuildSettings::default());
    }
    let content = std::fs::read_to_string(&path)?;
    load_settings_from_str(&content)
}

/// Parses build settings from the contents of a `weft.toml`.
pub fn load_settings_from_str(content: &str) -> Result<BuildSettings, ConfigError> {
    let file: SettingsFile =
        toml::from_str(content).map_err(|e| ConfigError::SettingsError(e.to_string()))?;
    Ok(file.build)
}

/// Loads the project file at `config_path` and the settings next to it.
pub fn load_configuration(config_path: &Path) -> Result<BuildConfiguration, ConfigError> {
    let project = load_project(config_path)?;
    let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let settings = load_settings(dir)?;
    Ok(BuildConfiguration::new(config_path, project, settings))
}

fn validate_project(config: &ProjectConfig) -> Result<(), ConfigError> {
    if let Some(files) = &config.files {
        if files.is_empty() {
            return Err(ConfigError::ValidationError(
                "the 'files' list is empty".to_string(),
            ));
        }
        if let Some(index) = files.iter().position(|f| f.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "'files' entry {index} is empty"
            )));
        }
    }
    Ok(())
}

/// Replaces `//` and `/* */` comments with spaces, leaving string literals alone.
///
/// Newlines inside comments are kept so parse errors report the original
/// line numbers.
pub fn strip_json_comments(input: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        Str,
        StrEscape,
        Line,
        Block,
    }

    let mut out = String::with_capacity(input.len());
    let mut state = State::Code;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek()) {
                ('"', _) => {
                    state = State::Str;
                    out.push(c);
                }
                ('/', Some('/')) => {
                    chars.next();
                    state = State::Line;
                    out.push_str("  ");
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = State::Block;
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            State::Str => {
                match c {
                    '\\' => state = State::StrEscape,
                    '"' => state = State::Code,
                    _ => {}
                }
                out.push(c);
            }
            State::StrEscape => {
                state = State::Str;
                out.push(c);
            }
            State::Line => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else if c == '\n' || c == '\r' {
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderingPolicy;

    #[test]
    fn parse_minimal_project() {
        let config = load_project_from_str(r#"{ "files": ["a.ts", "b.ts"] }"#).unwrap();
        assert_eq!(
            config.files,
            Some(vec!["a.ts".to_string(), "b.ts".to_string()])
        );
        assert_eq!(config.compiler_options.out, None);
    }

    #[test]
    fn parse_full_project() {
        let json = r#"
{
    // project sources
    "files": ["src/main.ts"],
    "compilerOptions": {
        "rootDir": "src",
        "out": "dist/bundle.js",
        "declaration": true,
        "target": "es5", /* downlevel */
        "noImplicitAny": true,
        "sourceMap": false
    },
    "exclude": ["node_modules"]
}
"#;
        let config = load_project_from_str(json).unwrap();
        let opts = &config.compiler_options;
        assert_eq!(opts.root_dir.as_deref(), Some("src"));
        assert_eq!(opts.out.as_deref(), Some("dist/bundle.js"));
        assert!(opts.declaration);
        assert_eq!(opts.target.as_deref(), Some("es5"));
        assert_eq!(opts.extra["noImplicitAny"], serde_json::Value::Bool(true));
        assert_eq!(opts.extra.len(), 2);
        assert!(config.extra.contains_key("exclude"));
    }

    #[test]
    fn out_file_alias() {
        let config =
            load_project_from_str(r#"{ "compilerOptions": { "outFile": "all.js" } }"#).unwrap();
        assert_eq!(config.compiler_options.out.as_deref(), Some("all.js"));
    }

    #[test]
    fn missing_files_is_not_an_error_at_load_time() {
        let config = load_project_from_str("{}").unwrap();
        assert!(config.files.is_none());
    }

    #[test]
    fn empty_files_list_rejected() {
        let err = load_project_from_str(r#"{ "files": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn blank_file_entry_rejected() {
        let err = load_project_from_str(r#"{ "files": ["a.ts", " "] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("entry 1")));
    }

    #[test]
    fn non_object_compiler_options_rejected() {
        let err = load_project_from_str(r#"{ "compilerOptions": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_json_rejected() {
        let err = load_project_from_str("{ files: [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_options_survive_round_trip() {
        let config =
            load_project_from_str(r#"{ "compilerOptions": { "jsx": "react" } }"#).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["compilerOptions"]["jsx"], "react");
    }

    // -- comment stripping --

    #[test]
    fn strips_line_and_block_comments() {
        let stripped = strip_json_comments("{ // c\n \"a\": /* x */ 1 }");
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn comment_markers_inside_strings_kept() {
        let src = r#"{ "url": "http://x/*y*/", "q": "a\"//b" }"#;
        let stripped = strip_json_comments(src);
        assert_eq!(stripped, src);
    }

    #[test]
    fn newlines_preserved_in_block_comments() {
        let stripped = strip_json_comments("/* a\nb */{}");
        assert_eq!(stripped.lines().count(), 2);
        assert_eq!(stripped.len(), "/* a\nb */{}".len());
    }

    // -- settings --

    #[test]
    fn settings_defaults() {
        let settings = load_settings_from_str("").unwrap();
        assert_eq!(settings, BuildSettings::default());
        assert_eq!(settings.ordering, OrderingPolicy::Resolution);
    }

    #[test]
    fn settings_from_toml() {
        let settings = load_settings_from_str(
            "[build]\nno_external_resolve = true\nsort_output = true\nordering = \"path\"\n",
        )
        .unwrap();
        assert!(settings.no_external_resolve);
        assert!(settings.sort_output);
        assert_eq!(settings.ordering, OrderingPolicy::Path);
    }

    #[test]
    fn settings_bad_ordering_rejected() {
        let err = load_settings_from_str("[build]\nordering = \"random\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::SettingsError(_)));
    }

    #[test]
    fn load_configuration_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tsconfig.json");
        std::fs::write(&config_path, r#"{ "files": ["a.ts"] }"#).unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "[build]\nsort_output = true\n").unwrap();

        let config = load_configuration(&config_path).unwrap();
        assert!(config.sort_output());
        assert!(!config.single_output());
        assert_eq!(config.base_dir(), dir.path());
    }

    #[test]
    fn settings_file_optional() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings(dir.path()).unwrap(), BuildSettings::default());
    }

    #[test]
    fn io_error_for_missing_project() {
        let err = load_project(Path::new("/nonexistent/tsconfig.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
