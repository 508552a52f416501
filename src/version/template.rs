//! Placeholder substitution for download URIs and file names
//!
//! Templates use `{name}` placeholders resolved against the fields of a
//! [`Version`]; `{{` and `}}` produce literal braces.
//!
//! ```text
//! https://example.com/releases/app-{version}.tar.gz
//! ```

use crate::version::error::TemplateError;
use crate::version::types::Version;

/// Render `template` by substituting every placeholder with the matching
/// version field.
pub fn render(template: &str, version: &Version) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|(_, next)| *next) == Some('{') => {
                chars.next();
                output.push('{');
            }
            '{' => {
                let rest = &template[idx + 1..];
                let Some(end) = rest.find('}') else {
                    return Err(TemplateError::Unbalanced {
                        template: template.to_string(),
                    });
                };
                let name = &rest[..end];
                if name.contains('{') {
                    return Err(TemplateError::Unbalanced {
                        template: template.to_string(),
                    });
                }
                let value = version
                    .field(name)
                    .ok_or_else(|| TemplateError::UnknownField {
                        field: name.to_string(),
                        template: template.to_string(),
                    })?;
                output.push_str(value);

                // skip the placeholder body and its closing brace
                for _ in 0..=name.chars().count() {
                    chars.next();
                }
            }
            '}' if chars.peek().map(|(_, next)| *next) == Some('}') => {
                chars.next();
                output.push('}');
            }
            '}' => {
                return Err(TemplateError::Unbalanced {
                    template: template.to_string(),
                });
            }
            other => output.push(other),
        }
    }

    Ok(output)
}
