//! Notification message template rendering.
//!
//! Templates carry `{placeholder}` tokens from a small fixed vocabulary
//! (`staff_name`, `duty_type`, `start_time`, `site_name`, `first_name`,
//! `last_name`, `unit_number`, `phone`, `balance`). Unknown tokens are left
//! verbatim so operators can spot typos in delivered text.

/// Substitute `{key}` tokens in `template` with their values.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholders() {
        let body = render(
            "Hi {first_name}, {duty_type} at {site_name} started at {start_time}.",
            &[
                ("first_name", "Ayse"),
                ("duty_type", "Cleaning"),
                ("site_name", "Palm Court"),
                ("start_time", "19:30"),
            ],
        );
        assert_eq!(body, "Hi Ayse, Cleaning at Palm Court started at 19:30.");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let body = render("{unit_number} / {unit_number}", &[("unit_number", "4B")]);
        assert_eq!(body, "4B / 4B");
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim() {
        let body = render("Hello {nmae}", &[("name", "Ali")]);
        assert_eq!(body, "Hello {nmae}");
    }

    #[test]
    fn empty_values_render_as_empty() {
        let body = render("Unit {unit_number}", &[("unit_number", "")]);
        assert_eq!(body, "Unit ");
    }
}
