//! Command implementations
//!
//! Every command renders to a `String`; `main` prints it. Text output follows
//! the `[SECTION]` layout, JSON output serializes the same records.

use crate::errors::UsageError;
use crate::output::{confidence_bar, Painter, THIN_SEPARATOR};
use anyhow::{Context as _, Result};
use bean_common::{
    symptom_label, AdvisorConfig, Control, ControlGroup, ControlType, DiagnosisReport,
    KnowledgeBase, Pest,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Product name shown by `about`
pub const PRODUCT_NAME: &str = "Bean Pest Management Advisor";

pub const DISCLAIMER: &str = "This tool is for informational purposes only. Always follow local \
agricultural guidelines and consult your local agricultural extension service for specific \
recommendations.";

/// Everything a command needs to render
pub struct Context<'a> {
    pub kb: &'a KnowledgeBase,
    pub config: &'a AdvisorConfig,
    pub painter: Painter,
}

impl<'a> Context<'a> {
    pub fn new(kb: &'a KnowledgeBase, config: &'a AdvisorConfig, painter: Painter) -> Self {
        Self { kb, config, painter }
    }

    fn json(&self) -> bool {
        self.config.output.json
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    out.push('\n');
    Ok(out)
}

// ============================================================================
// symptoms
// ============================================================================

pub fn symptoms(ctx: &Context<'_>) -> Result<String> {
    let options = ctx.kb.list_symptoms();
    if ctx.json() {
        return to_json(&options);
    }

    let width = options.iter().map(|o| o.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    writeln!(out, "{}", ctx.painter.section("SYMPTOMS"))?;
    for option in &options {
        writeln!(out, "  {:<width$}  {}", option.id, option.label, width = width)?;
    }
    Ok(out)
}

// ============================================================================
// diagnose
// ============================================================================

/// Resolve user-typed symptoms (ids or labels) to canonical ids
pub fn resolve_symptoms(kb: &KnowledgeBase, inputs: &[String]) -> Result<Vec<String>, UsageError> {
    if inputs.iter().all(|s| s.trim().is_empty()) {
        return Err(UsageError::NoSymptoms);
    }

    inputs
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|input| {
            kb.resolve_symptom(input)
                .ok_or_else(|| UsageError::UnknownSymptom(input.trim().to_string()))
        })
        .collect()
}

/// Ranked reports after applying the configured floor and top-K
pub fn select_reports(ctx: &Context<'_>, symptoms: &[String]) -> Result<Vec<DiagnosisReport>> {
    let ranked = ctx.kb.diagnose_strict(symptoms)?;
    let total = ranked.len();
    let shown: Vec<DiagnosisReport> = ranked
        .into_iter()
        .filter(|r| r.confidence_percent >= ctx.config.diagnosis.min_confidence)
        .take(ctx.config.diagnosis.top_k)
        .collect();

    debug!(total, shown = shown.len(), "Selected diagnosis reports");
    Ok(shown)
}

pub fn diagnose(ctx: &Context<'_>, inputs: &[String]) -> Result<String> {
    let symptoms = resolve_symptoms(ctx.kb, inputs)?;
    let reports = select_reports(ctx, &symptoms)?;

    if ctx.json() {
        return to_json(&reports);
    }

    let p = &ctx.painter;
    let mut out = String::new();
    let observed: Vec<String> = symptoms.iter().map(|s| symptom_label(s)).collect();
    writeln!(out, "Observed: {}", observed.join(", "))?;
    writeln!(out)?;

    if reports.is_empty() {
        writeln!(
            out,
            "No pests match the selected symptoms. Try selecting different symptoms."
        )?;
        return Ok(out);
    }

    writeln!(out, "{}", p.section("POTENTIAL PESTS"))?;
    for (rank, report) in reports.iter().enumerate() {
        writeln!(
            out,
            "{}. {} ({:.1}% match)",
            rank + 1,
            p.name(&report.display_name),
            report.confidence_percent
        )?;
        writeln!(out, "   {}", confidence_bar(report.confidence_percent))?;
        writeln!(out, "   Severity:    {}", p.severity(report.severity))?;
        writeln!(out, "   Description: {}", report.description)?;
        writeln!(out, "   Common symptoms:")?;
        for label in &report.symptom_list {
            writeln!(out, "     - {}", label)?;
        }
        writeln!(out, "   {}", p.dim(THIN_SEPARATOR))?;
    }

    let top = &reports[0];
    let controls = ctx.kb.controls_for_pest(&top.pest_id)?;
    writeln!(out)?;
    writeln!(out, "{} for {}", p.section("RECOMMENDED CONTROLS"), top.display_name)?;
    write_control_lines(&mut out, p, &controls)?;
    Ok(out)
}

// ============================================================================
// pests
// ============================================================================

pub fn pests(ctx: &Context<'_>) -> Result<String> {
    let pests = ctx.kb.list_pests();
    if ctx.json() {
        return to_json(pests);
    }

    let p = &ctx.painter;
    let mut out = String::new();
    writeln!(out, "{}", p.section("PEST LIBRARY"))?;
    for pest in pests {
        writeln!(
            out,
            "  {:<12} {:<12} {:<8} {} symptoms",
            pest.id,
            pest.name,
            p.severity(pest.severity),
            pest.symptoms.len()
        )?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct PestDetail<'a> {
    #[serde(flatten)]
    pest: &'a Pest,
    controls: Vec<&'a Control>,
}

pub fn pest(ctx: &Context<'_>, id: &str) -> Result<String> {
    let pest = ctx.kb.get_pest(id)?;
    let controls = ctx.kb.controls_for_pest(id)?;

    if ctx.json() {
        return to_json(&PestDetail { pest, controls });
    }

    let p = &ctx.painter;
    let mut out = String::new();
    writeln!(out, "{}", p.section(&pest.name.to_uppercase()))?;
    writeln!(out, "  Severity:    {}", p.severity(pest.severity))?;
    writeln!(out, "  Description: {}", pest.description)?;
    writeln!(out)?;
    writeln!(out, "{}", p.section("COMMON SYMPTOMS"))?;
    for label in pest.symptom_labels() {
        writeln!(out, "  - {}", label)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", p.section("RECOMMENDED CONTROLS"))?;
    write_control_lines(&mut out, p, &controls)?;
    Ok(out)
}

fn write_control_lines(out: &mut String, p: &Painter, controls: &[&Control]) -> Result<()> {
    if controls.is_empty() {
        writeln!(out, "  No specific controls found for this pest.")?;
        return Ok(());
    }
    for control in controls {
        writeln!(
            out,
            "  * {} ({} Risk, {} day PHI) - {}",
            p.name(&control.name),
            p.risk(control.risk_level),
            control.pre_harvest_interval,
            control.description
        )?;
    }
    Ok(())
}

// ============================================================================
// controls
// ============================================================================

pub fn controls(ctx: &Context<'_>, filter: Option<&str>) -> Result<String> {
    let wanted = match filter {
        Some(name) => Some(
            ControlType::parse(name)
                .ok_or_else(|| UsageError::UnknownControlType(name.to_string()))?,
        ),
        None => None,
    };

    let groups: Vec<ControlGroup<'_>> = ctx
        .kb
        .list_controls_by_type()
        .into_iter()
        .filter(|g| wanted.map_or(true, |t| t == g.control_type))
        .collect();

    if ctx.json() {
        return to_json(&groups);
    }

    let mut out = String::new();
    if groups.is_empty() {
        writeln!(out, "No controls of this type in the catalog.")?;
        return Ok(out);
    }
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(
            out,
            "{}",
            ctx.painter
                .section(&format!("{} CONTROLS", group.control_type.as_str().to_uppercase()))
        )?;
        for control in &group.controls {
            write_control_detail(&mut out, ctx, control, "  ")?;
        }
    }
    Ok(out)
}

pub fn control(ctx: &Context<'_>, id: &str) -> Result<String> {
    let control = ctx.kb.get_control(id)?;
    if ctx.json() {
        return to_json(control);
    }

    let mut out = String::new();
    write_control_detail(&mut out, ctx, control, "")?;
    Ok(out)
}

fn write_control_detail(
    out: &mut String,
    ctx: &Context<'_>,
    control: &Control,
    indent: &str,
) -> Result<()> {
    let p = &ctx.painter;
    writeln!(out, "{}{} ({})", indent, p.name(&control.name), control.control_type)?;
    writeln!(out, "{}  Risk Level:            {}", indent, p.risk(control.risk_level))?;
    writeln!(
        out,
        "{}  Pre-harvest Interval:  {} days",
        indent, control.pre_harvest_interval
    )?;
    writeln!(out, "{}  Effective Against:", indent)?;
    for target in &control.target_pests {
        match ctx.kb.find_pest(target) {
            Some(pest) => writeln!(
                out,
                "{}    - {} ({})",
                indent,
                pest.name,
                p.severity(pest.severity)
            )?,
            None => writeln!(out, "{}    - unknown pest '{}'", indent, target)?,
        }
    }
    writeln!(out, "{}  Description: {}", indent, control.description)?;
    Ok(())
}

// ============================================================================
// graph / about / config
// ============================================================================

pub fn graph(ctx: &Context<'_>) -> Result<String> {
    let graph = ctx.kb.graph();
    let edges = graph.edges();
    if ctx.json() {
        return to_json(&edges);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{} {} nodes, {} edges",
        ctx.painter.section("RELATIONSHIPS"),
        graph.node_count(),
        graph.edge_count()
    )?;
    for edge in &edges {
        writeln!(out, "  {} -[{}]- {}", edge.control_id, edge.label, edge.pest_id)?;
    }
    Ok(out)
}

pub fn about(version: &str) -> String {
    format!(
        "{}\nVersion {}\n\n\
         Identifies common bean pests from observed symptoms and recommends\n\
         integrated pest management controls, lowest risk first.\n\n\
         Disclaimer: {}\n",
        PRODUCT_NAME, version, DISCLAIMER
    )
}

pub fn show_config(config: &AdvisorConfig, path: &Path) -> Result<String> {
    let body = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    Ok(format!("# {}\n{}", path.display(), body))
}
