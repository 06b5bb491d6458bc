use anyhow::{bail, Result};
use chrono::NaiveDate;

use kata_lib::review::{due_score, Grade};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &mut App, another: bool, limit: usize, format: &OutputFormat) -> Result<()> {
    let today = app.today();

    if another {
        app.gate.allow_one_extra(today);
    }
    if app.gate.has_reached_limit(&app.prefs, today) {
        match format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "reviews": [],
                        "limit_reached": true,
                        "completed_today": app.gate.completed_today(&app.prefs, today),
                    })
                );
            }
            OutputFormat::Plain => {
                println!(
                    "Daily review limit reached ({} done today). Use --another for one more.",
                    app.gate.completed_today(&app.prefs, today)
                );
            }
        }
        return Ok(());
    }

    let reviews = app.store.due_reviews(limit, today)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "reviews": reviews }))?
            );
        }
        OutputFormat::Plain => {
            if reviews.is_empty() {
                println!("Nothing due for review today.");
                return Ok(());
            }
            for problem in &reviews {
                println!(
                    "{:>4}  [{}] {} ({}, {} days overdue)",
                    problem.id,
                    problem.lc_num,
                    problem.title,
                    problem.importance,
                    due_score(problem, today),
                );
            }
        }
    }

    Ok(())
}

pub fn run_done(app: &mut App, id: i64, grade: &str, format: &OutputFormat) -> Result<()> {
    let today = app.today();
    let grade = Grade::parse(grade);

    app.store.mark_review(id, grade, today)?;
    app.gate.record_review_completed(&mut app.prefs, today);

    let problem = app.store.problem_detail(id, today)?;
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "id": id,
                    "grade": grade.as_str(),
                    "review_count": problem.review_count,
                })
            );
        }
        OutputFormat::Plain => {
            println!(
                "Reviewed [{}] {} as {} (review count now {})",
                problem.lc_num,
                problem.title,
                grade.as_str(),
                problem.review_count
            );
        }
    }

    Ok(())
}

pub fn run_snooze(app: &App, id: i64, until: &str, format: &OutputFormat) -> Result<()> {
    let Ok(until) = NaiveDate::parse_from_str(until.trim(), "%Y-%m-%d") else {
        bail!("Invalid snooze date '{}', expected YYYY-MM-DD", until);
    };

    app.store.snooze(id, until)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "id": id, "snoozed_until": until.to_string() })
            );
        }
        OutputFormat::Plain => {
            println!("Snoozed problem {} until {}", id, until);
        }
    }

    Ok(())
}
