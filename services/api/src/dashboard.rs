use clap::Args;
use enrollment_analytics::analytics::{
    calculate_kpis, comparative, distribution_by, evolution, generate_insights, period,
    top_enrollment_dates, Dataset, Dimension, FilterSpec, KpiSummary,
};
use enrollment_analytics::error::AppError;
use enrollment_analytics::import::EnrollmentImporter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Enrollment CSV export to analyze
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Analysis period (YYYYP); defaults to the most recent one in the export
    #[arg(long)]
    pub(crate) period: Option<String>,
    /// Restrict the selection to one course
    #[arg(long)]
    pub(crate) course: Option<String>,
    /// Restrict the selection to one enrollment status
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Restrict the selection to one shift
    #[arg(long)]
    pub(crate) shift: Option<String>,
    /// Restrict the selection to one modality
    #[arg(long)]
    pub(crate) modality: Option<String>,
    /// Reference period (YYYYP) for the comparison insight
    #[arg(long)]
    pub(crate) reference_period: Option<String>,
    /// Include the distribution and peak-date breakdowns
    #[arg(long)]
    pub(crate) full: bool,
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        csv,
        period,
        course,
        status,
        shift,
        modality,
        reference_period,
        full,
    } = args;

    let dataset = EnrollmentImporter::from_path(csv)?;
    let filter = FilterSpec {
        period,
        course,
        status,
        shift,
        modality,
        reference_period,
        ..FilterSpec::default()
    };

    let analysis_period = filter.analysis_period(&dataset.current_period).to_string();
    let kpis = calculate_kpis(&dataset.records, &dataset.current_period, &filter);
    render_dashboard(&dataset, &kpis, &filter, &analysis_period, full);

    Ok(())
}

fn render_dashboard(
    dataset: &Dataset,
    kpis: &KpiSummary,
    filter: &FilterSpec,
    analysis_period: &str,
    full: bool,
) {
    println!("Enrollment dashboard");
    if let Some(branch) = &dataset.branch_name {
        println!("Unit: {branch}");
    }
    println!(
        "Analysis period: {} ({} records on file, {} periods)",
        period::format_period(analysis_period),
        dataset.records.len(),
        dataset.periods.len()
    );

    println!("\nKPIs");
    println!("- Students in selection: {}", kpis.total_students);
    println!("- Growth vs. previous year: {:.1}%", kpis.growth_rate);
    println!(
        "- Acquisition: {} ({:.1}% of total)",
        kpis.acquisition_count, kpis.acquisition_rate
    );
    println!(
        "- Retention: {} active ({:.1}%)",
        kpis.active_count, kpis.retention_rate
    );
    println!(
        "- Churn: {} ({:.1}%)",
        kpis.churn_count, kpis.churn_rate
    );

    println!("\nEvolution by period");
    for point in evolution(&dataset.records, filter) {
        let mut parts = Vec::new();
        if let Some(total) = point.total {
            parts.push(format!("{total} students"));
        }
        if let Some(acquisition) = point.acquisition {
            parts.push(format!("{acquisition} acquisitions"));
        }
        if let Some(renewal) = point.renewal {
            parts.push(format!("{renewal} renewals"));
        }
        println!("- {}: {}", point.period, parts.join(", "));
    }

    println!("\nYear-over-year (same half)");
    for point in comparative(&dataset.records, &dataset.current_period, filter) {
        println!("- {}: {}", point.label, point.total);
    }

    if full {
        println!("\nShift distribution");
        for slice in distribution_by(
            &dataset.records,
            filter,
            &dataset.current_period,
            Dimension::Shift,
        ) {
            println!("- {}: {}", slice.label, slice.count);
        }

        println!("\nCourse distribution");
        for slice in distribution_by(
            &dataset.records,
            filter,
            &dataset.current_period,
            Dimension::Course,
        ) {
            println!("- {}: {}", slice.label, slice.count);
        }

        println!("\nAcademic-term distribution");
        for slice in distribution_by(
            &dataset.records,
            filter,
            &dataset.current_period,
            Dimension::AcademicTerm,
        ) {
            println!("- {}: {}", slice.label, slice.count);
        }

        let peak_dates = top_enrollment_dates(&dataset.records, filter, &dataset.current_period);
        if !peak_dates.is_empty() {
            println!("\nPeak enrollment dates");
            for entry in peak_dates {
                println!("- {}: {}", entry.date, entry.count);
            }
        }
    }

    let insights = generate_insights(dataset, kpis, filter);
    if insights.is_empty() {
        println!("\nInsights: none for the current selection");
    } else {
        println!("\nInsights");
        for insight in insights {
            println!(
                "- [{}] {}: {}",
                insight.severity.label(),
                insight.title,
                insight.description
            );
        }
    }
}
