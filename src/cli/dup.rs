//! The duplicate command

use crate::cli::display::TableRenderer;
use crate::domain::config::{DupConf, DuplicationOptions, OutputFormat, ValidationDirective};
use crate::domain::edit::{DocumentCodec, EditOutcome};
use crate::domain::workflow::{Duplicator, RunReport, Target};
use crate::infrastructure::constants::EDITOR_ENVS;
use crate::infrastructure::editor::ExternalEditor;
use crate::infrastructure::validator::validator_for;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct DupCommand {
    /// TYPE NAME [NAME...] or TYPE/NAME [TYPE/NAME...]
    ///
    /// TYPE accepts kubectl names and short names (po, deploy, sts, job, cj, ...)
    #[arg(required = true, value_name = "TYPE[/NAME]")]
    pub args: Vec<String>,

    /// Kubernetes namespace
    /// If not specified, uses the namespace of the current kubeconfig context
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Create a standalone Pod from the workload's pod template
    #[arg(long, short = 'p')]
    pub pod: bool,

    /// Remove readiness, liveness and startup probes
    #[arg(long)]
    pub disable_probes: bool,

    /// Replace every container command with an idle loop
    #[arg(long)]
    pub loop_command: bool,

    /// Create the duplicate without opening an editor
    #[arg(long, short = 's')]
    pub skip_edit: bool,

    /// Use CRLF line endings in the edited file
    #[arg(long)]
    pub windows_line_endings: bool,

    /// Record the created configuration in the last-applied-configuration annotation
    #[arg(long)]
    pub save_config: bool,

    /// Format of the edited file
    #[arg(long, short = 'o', value_enum)]
    pub output: Option<OutputFormat>,

    /// How to treat client-side validation errors in the edited file
    #[arg(long, value_enum)]
    pub validate: Option<ValidationDirective>,

    /// Path to a kube-dup configuration file (TOML)
    /// If not provided, DUP_CONF_FILE is used when set
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<String>,
}

impl DupCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = DupConf::load(self.config_file.as_deref())?;
        let targets = Target::parse_args(&self.args)?;

        let options = self.resolve_options(&conf);
        let codec = DocumentCodec::new(self.output.unwrap_or(conf.edit.output));
        let validator = validator_for(self.validate.unwrap_or(conf.edit.validate));
        let editor = ExternalEditor::resolve(&EDITOR_ENVS, conf.edit.editor.as_deref());

        let duplicator = Duplicator::new_with_config(
            self.namespace.clone(),
            self.kubeconfig.clone(),
            self.context.clone(),
            Box::new(editor),
            validator,
            codec,
            options,
        )
        .await?;

        let report = duplicator.run(&targets).await?;
        print_report(&report);

        if !report.is_success() {
            anyhow::bail!("some duplicates could not be created or annotated");
        }
        Ok(())
    }

    /// Flags win over the configuration file, which wins over defaults.
    pub fn resolve_options(&self, conf: &DupConf) -> DuplicationOptions {
        DuplicationOptions {
            duplicate_inner_pod: self.pod || conf.duplicate.duplicate_inner_pod,
            disable_probes: self.disable_probes || conf.duplicate.disable_probes,
            loop_command: self.loop_command || conf.duplicate.loop_command,
            skip_edit: self.skip_edit || conf.edit.skip_edit,
            windows_line_endings: self.windows_line_endings || conf.edit.windows_line_endings,
            apply_annotation: self.save_config || conf.edit.apply_annotation,
        }
    }
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        match outcome {
            EditOutcome::Cancelled { reason, path, .. } => {
                eprintln!("Edit cancelled, {}.", reason);
                if let Some(path) = path {
                    eprintln!("A copy of your changes has been stored to {:?}", path);
                }
            }
            EditOutcome::Preserved { path, .. } => {
                eprintln!(
                    "The edits you made on objects that could not be created have been saved to {:?}",
                    path
                );
            }
            EditOutcome::Done { .. } => {}
        }
    }
    for err in &report.errors {
        eprintln!("error: {}", err);
    }

    if !report.summary.records.is_empty() {
        println!("{}", TableRenderer::new().render_commit_summary(&report.summary));
    }
}
