use anyhow::Result;

use kata_lib::dashboard::{self, project, TrendSeries};

use crate::app::App;
use crate::OutputFormat;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a series line as a unicode sparkline by projecting it onto a
/// small plot area and quantizing the y coordinates.
fn sparkline(series: &TrendSeries) -> (String, String) {
    let height = SPARK_LEVELS.len() as f64;
    let projection = project(series, series.labels.len() as f64, height, 0.0);

    let render = |points: &[kata_lib::dashboard::PlotPoint]| -> String {
        points
            .iter()
            .map(|p| {
                // y is screen-oriented: 0 at the top of the plot area.
                let level = (height - 1.0 - p.y).clamp(0.0, height - 1.0);
                SPARK_LEVELS[level as usize]
            })
            .collect()
    };

    (render(&projection.attempts), render(&projection.reviews))
}

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let summary = dashboard::summarize(&app.store, app.today())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} problems, {} attempts, {} reviews",
                summary.totals.problems, summary.totals.attempts, summary.totals.reviews
            );
            println!(
                "Importance: {} high / {} medium / {} low",
                summary.importance.high, summary.importance.medium, summary.importance.low
            );

            if !summary.top_tags.is_empty() {
                println!("\nTop tags:");
                for entry in &summary.top_tags {
                    println!("  #{:<20} {}", entry.tag, entry.count);
                }
            }

            let (attempts_line, reviews_line) = sparkline(&summary.trends.month);
            println!("\nLast 30 days:");
            println!("  attempts {}", attempts_line);
            println!("  reviews  {}", reviews_line);

            println!("\nLast 7 days:");
            for day in &summary.activity {
                println!(
                    "  {}  {} attempts, {} reviews",
                    day.date, day.attempts, day.reviews
                );
            }
        }
    }

    Ok(())
}
