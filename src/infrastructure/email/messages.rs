//! Email message bodies.

use super::service::OutgoingEmail;
use crate::domain::enrollment_event::EnrollmentEvent;

/// Builds the congratulations email sent after a successful enrollment.
///
/// Returns `None` when the student's address is unknown.
pub fn congratulations_email(event: &EnrollmentEvent, app_url: &str) -> Option<OutgoingEmail> {
    let to = event.user_email.clone()?;

    let greeting = match event.user_name.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("Hi {},", escape_html(name.trim())),
        _ => "Hi,".to_string(),
    };
    let title = escape_html(&event.course_title);
    let course_url = format!(
        "{}/courses/{}",
        app_url.trim_end_matches('/'),
        event.course_id
    );

    let html = format!(
        "<p>{greeting}</p>\
         <p>Congratulations! You are now enrolled in <strong>{title}</strong>.</p>\
         <p><a href=\"{course_url}\">Start learning</a></p>\
         <p>Tabor Academy</p>"
    );

    Some(OutgoingEmail {
        to,
        subject: format!("You're enrolled in {}", event.course_title),
        html,
    })
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
