//! Declarative field constraints.
//!
//! # Design
//! A `FieldSpec` is plain data: a kind, optional bounds and optional message
//! overrides. What a kind actually checks lives in `FieldKind::rules`, a
//! static table interpreted by `validate`, so adding a kind means adding a
//! row rather than another branch in the validator.

/// Largest accepted upload for the profile form.
pub const MAX_FILE_SIZE: u64 = 5_000_000;

pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const ACCEPTED_DOC_TYPES: &[&str] = &["application/pdf"];

/// The shape of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    File,
}

/// A single check, applied in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text is non-empty after trimming. Stops the field on failure.
    Required,
    MinLength,
    MaxLength,
    EmailFormat,
    UrlFormat,
    /// A file with a non-empty name was chosen. Stops the field on failure.
    FilePresent,
    MaxSize,
    MimeType,
}

impl Rule {
    /// Whether failing this rule makes the remaining rules meaningless.
    pub fn halts(self) -> bool {
        matches!(self, Rule::Required | Rule::FilePresent)
    }
}

impl FieldKind {
    pub fn rules(self) -> &'static [Rule] {
        match self {
            FieldKind::Text => &[Rule::Required, Rule::MinLength, Rule::MaxLength],
            FieldKind::Email => &[
                Rule::Required,
                Rule::MinLength,
                Rule::MaxLength,
                Rule::EmailFormat,
            ],
            FieldKind::Url => &[
                Rule::Required,
                Rule::MinLength,
                Rule::MaxLength,
                Rule::UrlFormat,
            ],
            FieldKind::File => &[Rule::FilePresent, Rule::MaxSize, Rule::MimeType],
        }
    }

    pub fn is_file(self) -> bool {
        self == FieldKind::File
    }
}

/// Message overrides. `None` falls back to the default wording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    pub required: Option<String>,
    pub too_short: Option<String>,
    pub too_long: Option<String>,
    pub invalid_format: Option<String>,
    pub too_large: Option<String>,
    pub wrong_mime: Option<String>,
    pub wrong_type: Option<String>,
}

/// Constraints for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    /// RawInput key the value is read from; usually `name`.
    pub input: String,
    pub kind: FieldKind,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub allowed_mime_types: Option<Vec<String>>,
    pub max_size_bytes: Option<u64>,
    pub messages: Messages,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            input: name.clone(),
            name,
            kind,
            min_length: None,
            max_length: None,
            allowed_mime_types: None,
            max_size_bytes: None,
            messages: Messages::default(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::File)
    }

    /// Read the value from a differently named input.
    pub fn from_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn min(mut self, chars: usize) -> Self {
        self.min_length = Some(chars);
        self
    }

    pub fn max(mut self, chars: usize) -> Self {
        self.max_length = Some(chars);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size_bytes = Some(bytes);
        self
    }

    pub fn accept(mut self, mime_types: &[&str]) -> Self {
        self.allowed_mime_types = Some(mime_types.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.messages.required = Some(message.into());
        self
    }

    pub fn min_message(mut self, message: impl Into<String>) -> Self {
        self.messages.too_short = Some(message.into());
        self
    }

    pub fn max_message(mut self, message: impl Into<String>) -> Self {
        self.messages.too_long = Some(message.into());
        self
    }

    pub fn format_message(mut self, message: impl Into<String>) -> Self {
        self.messages.invalid_format = Some(message.into());
        self
    }

    pub fn size_message(mut self, message: impl Into<String>) -> Self {
        self.messages.too_large = Some(message.into());
        self
    }

    pub fn mime_message(mut self, message: impl Into<String>) -> Self {
        self.messages.wrong_mime = Some(message.into());
        self
    }

    pub fn type_message(mut self, message: impl Into<String>) -> Self {
        self.messages.wrong_type = Some(message.into());
        self
    }

    /// The message reported when `rule` fails for this field.
    pub fn message_for(&self, rule: Rule) -> String {
        let custom = match rule {
            Rule::Required | Rule::FilePresent => &self.messages.required,
            Rule::MinLength => &self.messages.too_short,
            Rule::MaxLength => &self.messages.too_long,
            Rule::EmailFormat | Rule::UrlFormat => &self.messages.invalid_format,
            Rule::MaxSize => &self.messages.too_large,
            Rule::MimeType => &self.messages.wrong_mime,
        };
        if let Some(message) = custom {
            return message.clone();
        }
        match rule {
            Rule::Required | Rule::FilePresent => "Required".to_string(),
            Rule::MinLength => format!(
                "String must contain at least {} character(s)",
                self.min_length.unwrap_or_default()
            ),
            Rule::MaxLength => format!(
                "String must contain at most {} character(s)",
                self.max_length.unwrap_or_default()
            ),
            Rule::EmailFormat => "Invalid email".to_string(),
            Rule::UrlFormat => "Invalid url".to_string(),
            Rule::MaxSize => format!(
                "File must be at most {} bytes",
                self.max_size_bytes.unwrap_or_default()
            ),
            Rule::MimeType => format!(
                "File type must be one of: {}",
                self.allowed_mime_types.as_deref().unwrap_or_default().join(", ")
            ),
        }
    }

    /// The message reported when the value has the wrong shape.
    pub fn wrong_type_message(&self) -> String {
        if let Some(message) = &self.messages.wrong_type {
            return message.clone();
        }
        if self.kind.is_file() {
            "Expected a file, received text".to_string()
        } else {
            "Expected text, received a file".to_string()
        }
    }
}

/// An ordered, immutable collection of `FieldSpec`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRuleSet {
    specs: Vec<FieldSpec>,
}

impl FieldRuleSet {
    /// # Panics
    /// In debug builds, if two specs share a name.
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        debug_assert!(
            specs
                .iter()
                .enumerate()
                .all(|(i, spec)| specs[..i].iter().all(|earlier| earlier.name != spec.name)),
            "duplicate field name in rule set"
        );
        Self { specs }
    }

    /// The profile registration form: contact details plus a photo and a
    /// résumé.
    pub fn profile_registration() -> Self {
        Self::new(vec![
            FieldSpec::url("website").min(5).max(50),
            FieldSpec::text("about").min(5).max(144),
            FieldSpec::text("firstName").min(2).max(20),
            FieldSpec::text("lastName").min(2).max(20),
            FieldSpec::email("email").min(5).max(50),
            FieldSpec::text("country").min(2).max(20),
            FieldSpec::text("streetAddress").min(5),
            FieldSpec::text("city").min(2).max(20),
            FieldSpec::text("state").from_input("region").min(2).max(20),
            FieldSpec::text("zip").min(5).max(10),
            FieldSpec::file("image")
                .required_message("Image is required.")
                .max_size(MAX_FILE_SIZE)
                .size_message("Max file size is 5MB.")
                .accept(ACCEPTED_IMAGE_TYPES)
                .mime_message(".jpg, .jpeg, .png and .webp files are accepted."),
            FieldSpec::file("resume")
                .required_message("File is required.")
                .max_size(MAX_FILE_SIZE)
                .size_message("Max file size is 5MB.")
                .accept(ACCEPTED_DOC_TYPES)
                .mime_message("Only PDF's are accepted."),
        ])
    }

    /// Email and password for the login forms.
    pub fn credentials() -> Self {
        Self::new(vec![
            FieldSpec::email("email")
                .required_message("Email is required.")
                .format_message("Please enter a valid email address."),
            FieldSpec::text("password")
                .min(6)
                .required_message("Password is required.")
                .min_message("Password must be at least 6 characters."),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldRuleSet {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
