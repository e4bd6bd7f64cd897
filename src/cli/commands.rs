// CLI command definitions

use super::dup::DupCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kube-dup",
    version,
    about = "Duplicate a Kubernetes workload into an independent, editable copy",
    long_about = "Duplicates Pods, Deployments, StatefulSets, Jobs, CronJobs or any other resource. \
                  The duplicate is opened in your editor before it is created; validation and API \
                  errors reopen the editor with your changes preserved."
)]
pub struct CliArgs {
    #[command(flatten)]
    pub command: DupCommand,
}
