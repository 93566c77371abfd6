//! Writes the TypeScript definitions the dashboard imports.
//!
//! Every exported type in the library lands in one flat bindings
//! directory, dependencies included, so the frontend never hand-copies
//! a wire shape.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ts_rs::TS;

use dealflow::config::Config;
use dealflow::overview::DashboardStats;
use dealflow::pipeline::{
    PipelineBoard, PipelineSummary, Stage, StageColumn, StageDefinition, StageDisplay,
    StageMetrics, Staleness, Tone, UnknownStageGroup,
};
use dealflow::types::{
    Company, CompanyPatch, CompanyRef, CompanyStatus, Contact, ContactPatch, ContactRef,
    ContactStatus, Deal, DealType, Identity, NewCompany, NewContact, NewOpportunity, NewTask,
    Opportunity, OpportunityPatch, OpportunityRef, OpportunityStatus, Profile, ProfileRef,
    ProfileRole, Task, TaskKind, TaskPatch, TaskPriority, TaskStatus,
};
use dealflow::wizard::{DealField, DealSubmission, IndustryOption, StepDefinition};

#[derive(Parser)]
#[command(
    name = "generate_types",
    about = "Generate TypeScript bindings for the dashboard",
    version
)]
struct Args {
    /// Output directory (defaults to bindings.out_dir from config)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,
}

macro_rules! export_types {
    ($dir:expr, $($ty:ty),+ $(,)?) => {
        $(
            <$ty as TS>::export_all_to($dir)
                .with_context(|| format!("Failed to export {}", <$ty as TS>::name()))?;
        )+
    };
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let out_dir = args.out_dir.unwrap_or_else(|| config.bindings_path());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    export_types!(
        &out_dir,
        // Entity rows, insert payloads, patches
        Company,
        NewCompany,
        CompanyPatch,
        CompanyStatus,
        Contact,
        NewContact,
        ContactPatch,
        ContactStatus,
        Opportunity,
        NewOpportunity,
        OpportunityPatch,
        OpportunityStatus,
        DealType,
        Task,
        NewTask,
        TaskPatch,
        TaskKind,
        TaskPriority,
        TaskStatus,
        Profile,
        ProfileRole,
        Identity,
        // Joined-projection shapes
        CompanyRef,
        ContactRef,
        OpportunityRef,
        ProfileRef,
        // Pipeline board
        Deal,
        Stage,
        StageDefinition,
        StageDisplay,
        Tone,
        Staleness,
        StageMetrics,
        StageColumn,
        UnknownStageGroup,
        PipelineSummary,
        PipelineBoard,
        // Deal intake wizard
        StepDefinition,
        DealField,
        IndustryOption,
        DealSubmission,
        // Overview cards
        DashboardStats,
    );

    println!("TypeScript bindings written to {}", out_dir.display());
    Ok(())
}
