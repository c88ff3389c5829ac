//! `tokenweave`: render component styles from theme files.
//!
//! ```text
//! tokenweave render Calendar --theme dark.yaml --format css
//! tokenweave tokens Calendar --prefix my-picker
//! tokenweave numeric 3.14 abc " "
//! tokenweave list
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::debug;
use tokenweave::components::{default_prefix, register_builtin};
use tokenweave::{is_numeric_like, to_css, RegistryError, StyleRegistry, Theme};

/// Design tokens in, component styles out.
#[derive(Debug, Parser)]
#[command(name = "tokenweave", version, about)]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a component's style tree
    Render {
        /// Registered component name, e.g. Calendar
        component: String,

        #[command(flatten)]
        theme: ThemeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Css)]
        format: Format,
    },
    /// Print a component's resolved tokens and their fingerprint
    Tokens {
        component: String,

        #[command(flatten)]
        theme: ThemeArgs,
    },
    /// Check whether values look like finite numbers
    Numeric {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// List registered components
    List,
}

#[derive(Debug, clap::Args)]
struct ThemeArgs {
    /// Theme file (.yaml, .yml or .json); defaults to the built-in light theme
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Class prefix the component is styled under
    #[arg(short, long)]
    prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Css,
    Json,
    Yaml,
}

impl ThemeArgs {
    fn load(&self) -> Result<Theme> {
        match &self.theme {
            Some(path) => load_theme(path),
            None => Ok(Theme::new()),
        }
    }

    fn prefix_for(&self, component: &str) -> String {
        self.prefix
            .clone()
            .or_else(|| default_prefix(component).map(String::from))
            .unwrap_or_else(|| format!("ant-{}", component.to_lowercase()))
    }
}

fn load_theme(path: &Path) -> Result<Theme> {
    let theme = Theme::from_file(path)
        .with_context(|| format!("could not load theme {}", path.display()))?;
    theme
        .validate()
        .with_context(|| format!("invalid theme {}", path.display()))?;
    debug!("loaded theme {:?} from {}", theme.name(), path.display());
    Ok(theme)
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn run(cli: &Cli, registry: &StyleRegistry) -> Result<String> {
    match &cli.command {
        Command::Render {
            component,
            theme,
            format,
        } => {
            let prefix = theme.prefix_for(component);
            let tree = registry
                .styles_for(component, theme.load()?.tokens(), &prefix)
                .with_context(|| format!("could not style {}", component))?;
            Ok(match format {
                Format::Css => to_css(&tree),
                Format::Json => serde_json::to_string_pretty(&*tree)? + "\n",
                Format::Yaml => serde_yaml::to_string(&*tree)?,
            })
        }
        Command::Tokens { component, theme } => {
            let accessor = registry
                .get(component)
                .ok_or_else(|| RegistryError::UnknownComponent(component.clone()))?;
            let resolved = accessor
                .resolved_tokens(theme.load()?.tokens(), &theme.prefix_for(component))
                .with_context(|| format!("could not resolve tokens for {}", component))?;
            Ok(format!(
                "# fingerprint: {}\n{}",
                resolved.fingerprint(),
                serde_yaml::to_string(&resolved)?
            ))
        }
        Command::Numeric { values } => Ok(values
            .iter()
            .map(|v| format!("{:?}\t{}\n", v, is_numeric_like(v.as_str())))
            .collect()),
        Command::List => Ok(registry
            .component_names()
            .into_iter()
            .map(|name| name + "\n")
            .collect()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli.verbose)))
        .init();

    let registry = StyleRegistry::global();
    register_builtin(registry);

    match run(&cli, registry) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("tokenweave").chain(args.iter().copied()))?;
        let registry = StyleRegistry::new();
        register_builtin(&registry);
        run(&cli, &registry)
    }

    #[test]
    fn test_render_css_default_theme() {
        let css = run_args(&["render", "Calendar"]).unwrap();
        assert!(css.contains(".ant-picker-calendar-rtl {\n  direction: rtl;\n}"));
        assert!(css.contains("@media only screen and (max-width: 480px)"));
    }

    #[test]
    fn test_render_json_with_prefix() {
        let out = run_args(&["render", "Calendar", "--prefix", "x", "--format", "json"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json[".x-calendar"]["&-rtl"]["direction"], "rtl");
    }

    #[test]
    fn test_render_with_theme_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "colorPrimary: \"#722ed1\"\ncomponents:\n  Calendar:\n    monthControlWidth: 90"
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let css = run_args(&["render", "Calendar", "--theme", path]).unwrap();
        assert!(css.contains("border-color: #722ed1;"));
        assert!(css.contains("min-width: 90px;"));
    }

    #[test]
    fn test_missing_theme_file() {
        let err = run_args(&["render", "Calendar", "--theme", "/nonexistent/theme.yaml"]).unwrap_err();
        assert!(format!("{:#}", err).contains("could not load theme"));
    }

    #[test]
    fn test_unknown_component() {
        let err = run_args(&["tokens", "Calender"]).unwrap_err();
        assert!(err.to_string().contains("Calender"));
    }

    #[test]
    fn test_tokens_output() {
        let out = run_args(&["tokens", "Calendar"]).unwrap();
        assert!(out.starts_with("# fingerprint: "));
        assert!(out.contains("calendarCls:"));
        assert!(out.contains(".ant-picker-calendar"));
        assert!(out.contains("dateContentHeight: 86"));
    }

    #[test]
    fn test_numeric() {
        let out = run_args(&["numeric", "3.14", "abc", "-0"]).unwrap();
        assert_eq!(out, "\"3.14\"\ttrue\n\"abc\"\tfalse\n\"-0\"\ttrue\n");
    }

    #[test]
    fn test_list() {
        assert_eq!(run_args(&["list"]).unwrap(), "Calendar\n");
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["tokenweave", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "debug");
        assert_eq!(log_level(cli.verbose), "trace");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
