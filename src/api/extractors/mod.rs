//! Custom request extractors.

mod path;
mod validated_json;
mod validated_query;

pub use path::Path;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    // Field order from the map is unstable
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1))]
        size: u64,
    }

    #[test]
    fn messages_fall_back_to_field_name() {
        let errors = Probe {
            name: String::new(),
            size: 0,
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "name is required, size is invalid"
        );
    }
}
