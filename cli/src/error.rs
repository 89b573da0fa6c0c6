use std::ops::Range;

use ariadne::{Config, IndexType, ReportKind};
use asn1go::Diagnostic;

type Report = ariadne::Report<'static, (String, Range<usize>)>;

/// Helper function to convert asn.1 compiler diagnostics to a prettier format.
pub fn to_report(diag: &Diagnostic, file: &str, source: &str, color: bool) -> Report {
    let offset = diag
        .labels
        .iter()
        .find_map(|l| l.location.as_ref())
        .map_or(0, |l| l.start);

    let mut report = Report::build(ReportKind::Error, file.to_string(), offset)
        .with_code(&diag.error_code)
        .with_message(&diag.name)
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(color),
        );

    let mut note: Option<String> = None;
    for label in &diag.labels {
        let Some(location) = &label.location else {
            note = Some(match note {
                Some(note) => note + "\n" + &label.message,
                None => label.message.clone(),
            });
            continue;
        };

        // empty ranges mark a position, widen them so they are visible
        let span = if location.is_empty() {
            location.start..(location.start + 1).min(source.len())
        } else {
            location.clone()
        };

        report.add_label(ariadne::Label::new((file.to_string(), span)).with_message(&label.message))
    }

    if let Some(note) = note {
        report.set_note(note);
    }

    report.finish()
}
