//! Success summary handed to the external mailer.

use chrono::NaiveDate;

use crate::{model::RunOutcome, quality::QualityReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub subject: String,
    pub html: String,
}

pub fn render_summary(
    run_date: NaiveDate,
    outcome: &RunOutcome,
    quality: Option<&QualityReport>,
) -> Summary {
    let subject = format!("Weather ETL Pipeline Succeeded - {}", run_date.format("%Y-%m-%d"));

    let mut html =
        String::from("<h3>Weather Data ETL Pipeline Completed Successfully</h3>\n<ul>\n");
    html.push_str(&format!("<li>Cities attempted: {}</li>\n", outcome.attempted));
    html.push_str(&format!("<li>Cities fetched: {}</li>\n", outcome.fetched));
    if outcome.rejected > 0 {
        html.push_str(&format!("<li>Records rejected: {}</li>\n", outcome.rejected));
    }
    html.push_str(&format!("<li>Records persisted: {}</li>\n", outcome.persisted));
    if !outcome.failed_cities.is_empty() {
        html.push_str(&format!(
            "<li>Failed cities: {}</li>\n",
            escape(&outcome.failed_cities.join(", "))
        ));
    }
    html.push_str("</ul>\n");

    if let Some(report) = quality {
        html.push_str("<table>\n<tr><th>City</th><th>Rows (last window)</th></tr>\n");
        for c in &report.counts {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape(&c.city_name),
                c.count
            ));
        }
        html.push_str("</table>\n");
    }

    Summary { subject, html }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
