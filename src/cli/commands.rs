use crate::config::{parse_extensions, DagscanConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Maps Airflow DAG declarations to the pipeline artifacts their pod tasks run
#[derive(Parser, Debug)]
#[command(
    name = "dagscan",
    about = "Maps Airflow DAG declarations to the pipeline artifacts their pod tasks run",
    version,
    long_about = "dagscan parses every Python file under ROOT, finds variables bound to \
                  DAG(...) declarations, and reports the artifact path passed to each \
                  KubernetesPodOperator attached to those DAGs. Paths are only reported \
                  when they are string literals (or concatenations of literals) with the \
                  configured prefix.\n\n\
                  Examples:\n  \
                  dagscan prod/dags\n  \
                  dagscan prod/dags --format csv --output dag_info.csv\n  \
                  dagscan prod/dags --path-prefix jobs/ --path-index 2"
)]
pub struct CliArgs {
    #[arg(value_name = "ROOT", help = "Directory (or single file) to scan")]
    pub root: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "tsv",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Callee that declares a workflow [default: DAG]")]
    pub workflow_constructor: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Callee that declares a remote task [default: KubernetesPodOperator]"
    )]
    pub task_operator: Option<String>,

    #[arg(long, value_name = "NAME", help = "Task keyword naming the workflow [default: dag]")]
    pub workflow_keyword: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Task keyword holding the argument list [default: arguments]"
    )]
    pub arguments_keyword: Option<String>,

    #[arg(
        long,
        value_name = "INDEX",
        help = "Position of the artifact path in the argument list [default: 3]"
    )]
    pub path_index: Option<usize>,

    #[arg(long, value_name = "PREFIX", help = "Required artifact path prefix [default: etl/]")]
    pub path_prefix: Option<String>,

    #[arg(
        short = 'e',
        long = "extension",
        value_name = "EXT",
        help = "Source file extension to scan, repeatable or comma-separated [default: py]"
    )]
    pub extensions: Vec<String>,

    #[arg(long, help = "Skip files matched by .gitignore/.ignore and hidden files")]
    pub respect_gitignore: bool,

    #[arg(long, help = "Print the effective configuration to stderr")]
    pub show_config: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Overrides configuration values with the flags given on the command line.
    pub fn apply_to(&self, config: &mut DagscanConfig) {
        let markers = &mut config.markers;
        if let Some(value) = &self.workflow_constructor {
            markers.workflow_constructor = value.clone();
        }
        if let Some(value) = &self.task_operator {
            markers.task_operator = value.clone();
        }
        if let Some(value) = &self.workflow_keyword {
            markers.workflow_keyword = value.clone();
        }
        if let Some(value) = &self.arguments_keyword {
            markers.arguments_keyword = value.clone();
        }
        if let Some(value) = self.path_index {
            markers.path_index = value;
        }
        if let Some(value) = &self.path_prefix {
            markers.path_prefix = value.clone();
        }

        if !self.extensions.is_empty() {
            config.extensions = self
                .extensions
                .iter()
                .flat_map(|value| parse_extensions(value))
                .collect();
        }
        if self.respect_gitignore {
            config.respect_gitignore = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.to_lowercase();
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Tsv,
    Csv,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Tsv => super::output::OutputFormat::Tsv,
            OutputFormatArg::Csv => super::output::OutputFormat::Csv,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["dagscan", "prod/dags"]);
        assert_eq!(args.root, PathBuf::from("prod/dags"));
        assert_eq!(args.format, OutputFormatArg::Tsv);
        assert!(args.output.is_none());
        assert!(args.extensions.is_empty());
        assert!(!args.respect_gitignore);
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_root_is_required() {
        let result = CliArgs::try_parse_from(["dagscan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = CliArgs::try_parse_from(["dagscan", "dags", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_and_output() {
        let args = CliArgs::parse_from(["dagscan", "dags", "-f", "csv", "-o", "out.csv"]);
        assert_eq!(args.format, OutputFormatArg::Csv);
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_invalid_format() {
        let result = CliArgs::try_parse_from(["dagscan", "dags", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let args = CliArgs::parse_from([
            "dagscan",
            "dags",
            "--task-operator",
            "PodTask",
            "--path-index",
            "1",
            "--path-prefix",
            "jobs/",
            "-e",
            "py,pyw",
            "--extension",
            ".dag",
            "--respect-gitignore",
            "--log-level",
            "DEBUG",
        ]);
        let mut config = DagscanConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.markers.task_operator, "PodTask");
        assert_eq!(config.markers.workflow_constructor, "DAG");
        assert_eq!(config.markers.path_index, 1);
        assert_eq!(config.markers.path_prefix, "jobs/");
        assert_eq!(config.extensions, vec!["py", "pyw", "dag"]);
        assert!(config.respect_gitignore);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let args = CliArgs::parse_from(["dagscan", "dags"]);
        let mut config = DagscanConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config, DagscanConfig::default());
    }
}
