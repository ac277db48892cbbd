//! The generic validator.
//!
//! `validate` walks every `FieldSpec` of a rule set, runs the rule table of
//! its kind against the matching `RawInput` entry and collects either a
//! `ValidatedRecord` or `FieldErrors`. It performs no I/O.

use std::collections::BTreeMap;

use email_address::{EmailAddress, Options};
use url::Url;

use crate::rules::{FieldRuleSet, FieldSpec, Rule};
use crate::types::{FieldErrors, FieldValue, FileDescriptor, RawInput, ValidatedRecord};

/// Validate `raw` against `rules`.
///
/// Returns `Ok` only when no field produced a message. Fields without a spec
/// are dropped; text values are trimmed.
pub fn validate(raw: &RawInput, rules: &FieldRuleSet) -> Result<ValidatedRecord, FieldErrors> {
    let mut values = BTreeMap::new();
    let mut errors = FieldErrors::new();

    for spec in rules {
        match check_field(spec, raw.get(&spec.input)) {
            Ok(value) => {
                values.insert(spec.name.clone(), value);
            }
            Err(messages) => {
                for message in messages {
                    errors.push(spec.name.clone(), message);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidatedRecord::new(values))
    } else {
        Err(errors)
    }
}

/// Borrowed view of a value, already coerced to the field's kind.
enum Candidate<'a> {
    Text(&'a str),
    File(Option<&'a FileDescriptor>),
}

fn check_field(spec: &FieldSpec, value: Option<&FieldValue>) -> Result<FieldValue, Vec<String>> {
    let candidate = match (spec.kind.is_file(), value) {
        (false, None) => Candidate::Text(""),
        (false, Some(FieldValue::Text(text))) => Candidate::Text(text.trim()),
        (false, Some(FieldValue::File(_))) => return Err(vec![spec.wrong_type_message()]),
        // A file input left empty is often submitted as an empty string.
        (true, None | Some(FieldValue::Text(_))) => Candidate::File(None),
        (true, Some(FieldValue::File(file))) => Candidate::File(Some(file)),
    };

    let mut messages = Vec::new();
    for &rule in spec.kind.rules() {
        if !passes(rule, spec, &candidate) {
            messages.push(spec.message_for(rule));
            if rule.halts() {
                break;
            }
        }
    }

    if !messages.is_empty() {
        return Err(messages);
    }
    match candidate {
        Candidate::Text(text) => Ok(FieldValue::Text(text.to_string())),
        Candidate::File(Some(file)) => Ok(FieldValue::File(file.clone())),
        // FilePresent halts before we get here.
        Candidate::File(None) => Err(vec![spec.message_for(Rule::FilePresent)]),
    }
}

fn passes(rule: Rule, spec: &FieldSpec, candidate: &Candidate<'_>) -> bool {
    match (rule, candidate) {
        (Rule::Required, Candidate::Text(text)) => !text.is_empty(),
        (Rule::MinLength, Candidate::Text(text)) => spec
            .min_length
            .map_or(true, |min| text.chars().count() >= min),
        (Rule::MaxLength, Candidate::Text(text)) => spec
            .max_length
            .map_or(true, |max| text.chars().count() <= max),
        (Rule::EmailFormat, Candidate::Text(text)) => is_email(text),
        (Rule::UrlFormat, Candidate::Text(text)) => is_web_url(text),
        (Rule::FilePresent, Candidate::File(file)) => file.is_some_and(|f| !f.name.is_empty()),
        (Rule::MaxSize, Candidate::File(Some(file))) => spec
            .max_size_bytes
            .map_or(true, |max| file.size_bytes <= max),
        (Rule::MimeType, Candidate::File(Some(file))) => spec
            .allowed_mime_types
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|m| *m == file.mime_type)),
        // A rule from the other family never applies.
        _ => true,
    }
}

/// A bare `local@domain` address. Display names (`Ada <ada@x.org>`) and
/// `[ip]` domain literals are refused.
fn is_email(value: &str) -> bool {
    let options = Options::default()
        .without_display_text()
        .without_domain_literal();
    EmailAddress::parse_with_options(value, options).is_ok()
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
