use super::dataset::Dataset;
use super::distribution::UNSPECIFIED_LABEL;
use super::domain::EnrollmentRecord;
use super::filter::{filter_records, EnrollmentKind, FilterSpec};
use super::kpi::KpiSummary;
use super::period::format_period;
use serde::Serialize;
use std::collections::HashSet;

/// Symbolic icon identifier; resolution to a rendered glyph is the
/// presentation layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightIcon {
    ArrowUpRight,
    ArrowDownLeft,
    TrendingUp,
    TrendingDown,
    Focus,
    Users,
    UserPlus,
    UserCheck,
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Success,
    Primary,
    Warning,
    Danger,
}

impl InsightSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Primary => "Primary",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }
}

/// One natural-language finding for the insights panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub icon: InsightIcon,
    pub severity: InsightSeverity,
    pub title: String,
    pub description: String,
}

/// The panel never shows more than this many findings.
pub const MAX_INSIGHTS: usize = 4;

/// Runs the five heuristic rules in their fixed priority order, deduplicates
/// by title (earliest wins), and truncates to [`MAX_INSIGHTS`]. Each rule is
/// independent and fires only when its trigger condition holds.
pub fn generate_insights(
    dataset: &Dataset,
    kpis: &KpiSummary,
    filter: &FilterSpec,
) -> Vec<Insight> {
    let analysis_period = filter.analysis_period(&dataset.current_period).to_string();
    let filtered = filter_records(&dataset.records, &filter.with_period(analysis_period.clone()));

    let mut candidates = Vec::new();
    candidates.extend(reference_comparison(dataset, filter, &analysis_period, filtered.len()));
    candidates.extend(overall_growth(kpis));
    candidates.extend(course_focus(filter, &filtered));
    candidates.extend(enrollment_kind_focus(filter, kpis, &filtered));
    candidates.extend(shift_focus(filter, &filtered));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|insight| seen.insert(insight.title.clone()))
        .take(MAX_INSIGHTS)
        .collect()
}

/// Rule 1: analysis period vs. the explicitly chosen reference period, under
/// the same non-period filter. Fires only on a change above 1%.
fn reference_comparison(
    dataset: &Dataset,
    filter: &FilterSpec,
    analysis_period: &str,
    current_total: usize,
) -> Option<Insight> {
    let reference = filter.reference_period.as_deref()?;
    if reference == analysis_period {
        return None;
    }

    let reference_total = filter_records(&dataset.records, &filter.with_period(reference)).len();
    if reference_total == 0 {
        return None;
    }

    let change = current_total as f64 - reference_total as f64;
    let percentage = change / reference_total as f64 * 100.0;
    if percentage.abs() <= 1.0 {
        return None;
    }

    let grew = percentage > 0.0;
    Some(Insight {
        icon: if grew { InsightIcon::ArrowUpRight } else { InsightIcon::ArrowDownLeft },
        severity: if grew { InsightSeverity::Success } else { InsightSeverity::Danger },
        title: format!(
            "Comparativo: {} vs {}",
            format_period(analysis_period),
            format_period(reference)
        ),
        description: format!(
            "Houve uma {} de {:.1}% ({} alunos) em relação ao semestre de referência.",
            if grew { "aumento" } else { "queda" },
            percentage.abs(),
            change.abs() as i64
        ),
    })
}

/// Rule 2: growth against the prior equivalent period, above 5% either way.
fn overall_growth(kpis: &KpiSummary) -> Option<Insight> {
    if kpis.growth_rate.abs() <= 5.0 {
        return None;
    }

    let grew = kpis.growth_rate > 0.0;
    Some(Insight {
        icon: if grew { InsightIcon::TrendingUp } else { InsightIcon::TrendingDown },
        severity: if grew { InsightSeverity::Success } else { InsightSeverity::Danger },
        title: if grew {
            "Crescimento Expressivo".to_string()
        } else {
            "Redução no Nº de Alunos".to_string()
        },
        description: format!(
            "A seleção atual mostra uma {} de {:.1}% em comparação ao período anterior equivalente.",
            if grew { "aumento" } else { "queda" },
            kpis.growth_rate.abs()
        ),
    })
}

/// Rule 3: either a drill-down on the selected course or a highlight of the
/// most populous one; the two branches are mutually exclusive.
fn course_focus(filter: &FilterSpec, filtered: &[&EnrollmentRecord]) -> Option<Insight> {
    if let Some(course) = &filter.course {
        let total = filtered.len();
        let acquisitions = filtered.iter().filter(|r| r.is_acquisition()).count();
        let percentage = if total > 0 {
            acquisitions as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        return Some(Insight {
            icon: InsightIcon::Focus,
            severity: InsightSeverity::Primary,
            title: format!("Análise do Curso: {course}"),
            description: format!(
                "Este curso possui {total} alunos na seleção. Desses, {percentage:.0}% são de captação (novos alunos)."
            ),
        });
    }

    if filtered.is_empty() {
        return None;
    }
    let (name, count) = top_course(filtered)?;
    let share = count as f64 / filtered.len() as f64 * 100.0;
    Some(Insight {
        icon: InsightIcon::Users,
        severity: InsightSeverity::Primary,
        title: "Curso Destaque".to_string(),
        description: format!(
            "O curso de {name} é o mais populoso na seleção atual, com {count} alunos, representando {share:.0}% do total."
        ),
    })
}

/// Rule 4: either a drill-down on the selected enrollment kind or a profile
/// of the base when it leans heavily toward new or veteran students.
fn enrollment_kind_focus(
    filter: &FilterSpec,
    kpis: &KpiSummary,
    filtered: &[&EnrollmentRecord],
) -> Option<Insight> {
    match filter.kind {
        EnrollmentKind::Acquisition | EnrollmentKind::Renewal => {
            let (name, count) = top_course(filtered)?;
            let acquisition = filter.kind == EnrollmentKind::Acquisition;
            Some(Insight {
                icon: if acquisition { InsightIcon::UserPlus } else { InsightIcon::UserCheck },
                severity: InsightSeverity::Primary,
                title: format!(
                    "Análise de {}",
                    if acquisition { "Captação" } else { "Rematrícula" }
                ),
                description: format!(
                    "Para este filtro, o curso de {name} se destaca com {count} alunos."
                ),
            })
        }
        EnrollmentKind::All => {
            if filtered.len() <= 20 {
                return None;
            }
            let percentage = kpis.acquisition_rate;
            if percentage > 65.0 {
                Some(Insight {
                    icon: InsightIcon::UserPlus,
                    severity: InsightSeverity::Primary,
                    title: "Perfil de Novos Alunos".to_string(),
                    description: format!(
                        "A maioria ({percentage:.0}%) dos alunos nesta seleção são de captação (novas matrículas)."
                    ),
                })
            } else if percentage < 35.0 {
                let renewal_share = 100.0 - percentage;
                Some(Insight {
                    icon: InsightIcon::UserCheck,
                    severity: InsightSeverity::Primary,
                    title: "Perfil de Veteranos".to_string(),
                    description: format!(
                        "A base de alunos é de rematrículas ({renewal_share:.0}%), indicando boa retenção."
                    ),
                })
            } else {
                None
            }
        }
    }
}

/// Rule 5: either a drill-down on the selected shift or a dominant-shift
/// highlight when one shift concentrates more than 60% of students.
fn shift_focus(filter: &FilterSpec, filtered: &[&EnrollmentRecord]) -> Option<Insight> {
    if let Some(shift) = &filter.shift {
        let (name, count) = top_course(filtered)?;
        return Some(Insight {
            icon: InsightIcon::Clock,
            severity: InsightSeverity::Primary,
            title: format!("Análise do Turno: {shift}"),
            description: format!(
                "Neste turno, o curso de {name} é o mais representativo, com {count} alunos."
            ),
        });
    }

    if filtered.len() <= 10 {
        return None;
    }
    let (shift, count) = top_by(filtered, |record| &record.shift)?;
    let share = count as f64 / filtered.len() as f64 * 100.0;
    if share <= 60.0 {
        return None;
    }
    Some(Insight {
        icon: InsightIcon::Clock,
        severity: InsightSeverity::Primary,
        title: "Preferência de Turno".to_string(),
        description: format!(
            "O turno da {shift} é o preferido, concentrando {share:.0}% dos alunos."
        ),
    })
}

fn top_course(records: &[&EnrollmentRecord]) -> Option<(String, usize)> {
    top_by(records, |record| &record.course)
}

/// Highest-count category among the records, blanks bucketed under the
/// placeholder label. Ties resolve to the first-seen category.
fn top_by<F>(records: &[&EnrollmentRecord], key: F) -> Option<(String, usize)>
where
    F: Fn(&EnrollmentRecord) -> &String,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records.iter().copied() {
        let value = key(record);
        let label = if value.is_empty() {
            UNSPECIFIED_LABEL.to_string()
        } else {
            value.clone()
        };
        match counts.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::calculate_kpis;

    fn record(period: &str, course: &str, shift: &str, flag: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            period: period.to_string(),
            course: course.to_string(),
            shift: shift.to_string(),
            status: "MATRICULADO".to_string(),
            acquisition_flag: flag.to_string(),
            ..EnrollmentRecord::default()
        }
    }

    fn dataset(records: Vec<EnrollmentRecord>) -> Dataset {
        Dataset::from_records(records)
    }

    fn insights_for(dataset: &Dataset, filter: &FilterSpec) -> Vec<Insight> {
        let kpis = calculate_kpis(&dataset.records, &dataset.current_period, filter);
        generate_insights(dataset, &kpis, filter)
    }

    #[test]
    fn never_more_than_four_and_no_duplicate_titles() {
        let mut records = Vec::new();
        for _ in 0..30 {
            records.push(record("20261", "DIREITO", "NOITE", "CAPTAÇÃO"));
        }
        records.push(record("20251", "DIREITO", "NOITE", ""));
        let dataset = dataset(records);

        let filter = FilterSpec {
            reference_period: Some("20251".to_string()),
            ..FilterSpec::default()
        };
        let insights = insights_for(&dataset, &filter);

        assert!(insights.len() <= MAX_INSIGHTS);
        let titles: HashSet<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles.len(), insights.len());
    }

    #[test]
    fn acquisition_heavy_base_yields_new_student_profile() {
        let mut records = Vec::new();
        for i in 0..25 {
            records.push(record("20261", "DIREITO", "NOITE", if i < 20 { "CAPTAÇÃO" } else { "" }));
        }
        let dataset = dataset(records);
        let insights = insights_for(&dataset, &FilterSpec::default());

        let profile = insights
            .iter()
            .find(|i| i.title == "Perfil de Novos Alunos")
            .expect("profile insight fires at 80% acquisition");
        assert!(profile.description.contains("80%"));
        assert_eq!(profile.icon, InsightIcon::UserPlus);
    }

    #[test]
    fn veteran_base_cites_the_renewal_share() {
        let mut records = Vec::new();
        for i in 0..25 {
            records.push(record("20261", "DIREITO", "NOITE", if i < 5 { "CAPTAÇÃO" } else { "" }));
        }
        let dataset = dataset(records);
        let insights = insights_for(&dataset, &FilterSpec::default());

        let profile = insights
            .iter()
            .find(|i| i.title == "Perfil de Veteranos")
            .expect("veteran insight fires at 20% acquisition");
        assert!(profile.description.contains("80%"));
    }

    #[test]
    fn balanced_base_produces_no_profile_insight() {
        let mut records = Vec::new();
        for i in 0..30 {
            records.push(record("20261", "DIREITO", "NOITE", if i < 15 { "CAPTAÇÃO" } else { "" }));
        }
        let dataset = dataset(records);
        let insights = insights_for(&dataset, &FilterSpec::default());
        assert!(insights.iter().all(|i| i.title != "Perfil de Novos Alunos"));
        assert!(insights.iter().all(|i| i.title != "Perfil de Veteranos"));
    }

    #[test]
    fn reference_comparison_leads_and_reports_the_delta() {
        let mut records = Vec::new();
        for _ in 0..120 {
            records.push(record("20261", "DIREITO", "NOITE", ""));
        }
        for _ in 0..100 {
            records.push(record("20251", "DIREITO", "NOITE", ""));
        }
        let dataset = dataset(records);
        let filter = FilterSpec {
            reference_period: Some("20251".to_string()),
            ..FilterSpec::default()
        };
        let insights = insights_for(&dataset, &filter);

        let comparison = &insights[0];
        assert_eq!(comparison.title, "Comparativo: 2026.1 vs 2025.1");
        assert!(comparison.description.contains("aumento"));
        assert!(comparison.description.contains("20.0%"));
        assert!(comparison.description.contains("20 alunos"));
        assert_eq!(comparison.severity, InsightSeverity::Success);
    }

    #[test]
    fn reference_comparison_skips_changes_within_one_percent() {
        let mut records = Vec::new();
        for _ in 0..100 {
            records.push(record("20261", "DIREITO", "NOITE", ""));
        }
        for _ in 0..100 {
            records.push(record("20251", "DIREITO", "NOITE", ""));
        }
        let dataset = dataset(records);
        let filter = FilterSpec {
            reference_period: Some("20251".to_string()),
            ..FilterSpec::default()
        };
        let insights = insights_for(&dataset, &filter);
        assert!(insights.iter().all(|i| !i.title.starts_with("Comparativo")));
    }

    #[test]
    fn selected_course_branch_replaces_top_course_highlight() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(record("20261", "DIREITO", "NOITE", if i < 4 { "CAPTAÇÃO" } else { "" }));
        }
        let dataset = dataset(records);
        let filter = FilterSpec {
            course: Some("DIREITO".to_string()),
            ..FilterSpec::default()
        };
        let insights = insights_for(&dataset, &filter);

        let focused = insights
            .iter()
            .find(|i| i.title == "Análise do Curso: DIREITO")
            .expect("course drill-down fires");
        assert!(focused.description.contains("10 alunos"));
        assert!(focused.description.contains("40%"));
        assert!(insights.iter().all(|i| i.title != "Curso Destaque"));
    }

    #[test]
    fn top_course_highlight_cites_count_and_share() {
        let mut records = Vec::new();
        for _ in 0..6 {
            records.push(record("20261", "DIREITO", "NOITE", ""));
        }
        for _ in 0..2 {
            records.push(record("20261", "MEDICINA", "NOITE", ""));
        }
        let dataset = dataset(records);
        let insights = insights_for(&dataset, &FilterSpec::default());

        let highlight = insights
            .iter()
            .find(|i| i.title == "Curso Destaque")
            .expect("highlight fires");
        assert!(highlight.description.contains("DIREITO"));
        assert!(highlight.description.contains("6 alunos"));
        assert!(highlight.description.contains("75%"));
    }

    #[test]
    fn dominant_shift_fires_only_above_sixty_percent() {
        let mut records = Vec::new();
        for _ in 0..9 {
            records.push(record("20261", "DIREITO", "NOITE", ""));
        }
        for _ in 0..3 {
            records.push(record("20261", "DIREITO", "MANHÃ", ""));
        }
        let dataset = dataset(records);
        let insights = insights_for(&dataset, &FilterSpec::default());
        let preference = insights
            .iter()
            .find(|i| i.title == "Preferência de Turno")
            .expect("dominant shift fires at 75%");
        assert!(preference.description.contains("NOITE"));

        // An even split stays silent.
        let mut even = Vec::new();
        for _ in 0..6 {
            even.push(record("20261", "DIREITO", "NOITE", ""));
        }
        for _ in 0..6 {
            even.push(record("20261", "DIREITO", "MANHÃ", ""));
        }
        let dataset = Dataset::from_records(even);
        let insights = insights_for(&dataset, &FilterSpec::default());
        assert!(insights.iter().all(|i| i.title != "Preferência de Turno"));
    }

    #[test]
    fn selected_shift_branch_names_its_top_course() {
        let mut records = Vec::new();
        for _ in 0..4 {
            records.push(record("20261", "DIREITO", "NOITE", ""));
        }
        records.push(record("20261", "MEDICINA", "NOITE", ""));
        let dataset = dataset(records);
        let filter = FilterSpec {
            shift: Some("NOITE".to_string()),
            ..FilterSpec::default()
        };
        let insights = insights_for(&dataset, &filter);

        let focused = insights
            .iter()
            .find(|i| i.title == "Análise do Turno: NOITE")
            .expect("shift drill-down fires");
        assert!(focused.description.contains("DIREITO"));
    }

    #[test]
    fn empty_dataset_generates_nothing() {
        let dataset = Dataset::from_records(Vec::new());
        assert!(insights_for(&dataset, &FilterSpec::default()).is_empty());
    }
}
