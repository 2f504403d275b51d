//! HTML rendering for the search form
//!
//! A single page: the form, then either the result or an error, then the
//! most recent searches.

use crate::history::SearchRecord;
use crate::selector::SearchOutcome;

/// Values echoed back into the form fields
#[derive(Debug, Default)]
pub struct FormValues<'a> {
    pub anchor_city: &'a str,
    pub radius: &'a str,
    pub cities: &'a str,
}

/// Escape text for use in HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page
pub fn render_page(
    form: &FormValues<'_>,
    outcome: Option<&SearchOutcome>,
    error: Option<&str>,
    recent: &[SearchRecord],
) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        r#"<form method="post" action="/search">
  <label>Anchor city <input name="anchor_city" value="{anchor}" required></label>
  <label>Radius (miles) <input name="radius" type="number" step="any" min="0" value="{radius}" required></label>
  <label>Cities (one per line)<br><textarea name="cities" rows="10" cols="40" required>{cities}</textarea></label>
  <button type="submit">Find closest city</button>
</form>
"#,
        anchor = escape(form.anchor_city),
        radius = escape(form.radius),
        cities = escape(form.cities),
    ));

    if let Some(error) = error {
        body.push_str(&format!(
            "<p class=\"error\">Error: {}</p>\n",
            escape(error)
        ));
    }

    if let Some(outcome) = outcome {
        body.push_str(&render_outcome(outcome));
    }

    if !recent.is_empty() {
        body.push_str("<h2>Recent searches</h2>\n<ul>\n");
        for record in recent {
            body.push_str(&format!(
                "  <li>{} &rarr; {} ({:.2} miles, radius {}) <small>{}</small></li>\n",
                escape(&record.anchor_city),
                escape(&record.closest_city),
                record.driving_distance,
                record.radius,
                record.created_at.format("%Y-%m-%d %H:%M UTC"),
            ));
        }
        body.push_str("</ul>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Closest City Finder</title>
</head>
<body>
<h1>Closest City Finder</h1>
{}</body>
</html>
"#,
        body
    )
}

fn render_outcome(outcome: &SearchOutcome) -> String {
    let mut html = format!(
        "<section class=\"result\">\n<h2>Result</h2>\n<p>Closest city to {} ({:.4}, {:.4}): <strong>{}</strong>, {:.2} miles driving</p>\n",
        escape(&outcome.anchor_city),
        outcome.anchor_coordinates.lat,
        outcome.anchor_coordinates.lng,
        escape(&outcome.closest_city),
        outcome.driving_distance,
    );

    html.push_str("<table>\n<tr><th>City</th><th>Linear miles</th><th>Driving miles</th></tr>\n");
    for candidate in &outcome.candidates {
        let driving = outcome
            .driving_distances
            .iter()
            .find(|d| d.city == candidate.city)
            .map(|d| format!("{:.2}", d.miles))
            .unwrap_or_else(|| "-".to_string());
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{}</td></tr>\n",
            escape(&candidate.city),
            candidate.linear_distance,
            driving
        ));
    }
    html.push_str("</table>\n");

    if !outcome.skipped.is_empty() {
        html.push_str("<ul class=\"skipped\">\n");
        for skipped in &outcome.skipped {
            html.push_str(&format!(
                "  <li>Skipped {}: {}</li>\n",
                escape(&skipped.city),
                escape(&skipped.reason)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section>\n");
    html
}
