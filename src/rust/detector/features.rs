use std::fmt;

/// Text shown in an untouched app-name field. Never accepted as a real name.
pub const APP_NAME_PLACEHOLDER: &str = "Enter App Name";

/// Upper bound of the star rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Rejection raised by the input gate before any model or network work happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid App Name.")]
    EmptyAppName,
    #[error("Please enter a valid App Name (\"{}\" is only the placeholder).", APP_NAME_PLACEHOLDER)]
    PlaceholderAppName,
}

/// An app name that passed the input gate.
///
/// The stored value is trimmed; the classifier never sees it, only the prompt does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppName(String);

impl AppName {
    /// Accepts any non-empty text other than [`APP_NAME_PLACEHOLDER`].
    ///
    /// # Example
    /// ```
    /// use fraudgate::AppName;
    ///
    /// assert!(AppName::parse("Flashlight Pro").is_ok());
    /// assert!(AppName::parse("   ").is_err());
    /// assert!(AppName::parse("Enter App Name").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyAppName);
        }
        if name == APP_NAME_PLACEHOLDER {
            return Err(ValidationError::PlaceholderAppName);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five numeric attributes the fraud model was trained on.
///
/// Bounds mirror the input form: the rating is clamped into `[0, 5]` and the
/// counts are unsigned. `max_installs` is not checked against `installs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppFeatures {
    rating: f64,
    rating_count: u64,
    installs: u64,
    max_installs: u64,
    editor_choice: bool,
}

impl Default for AppFeatures {
    fn default() -> Self {
        Self::new(3.0, 1000, 5000, 6000, true)
    }
}

impl AppFeatures {
    pub fn new(
        rating: f64,
        rating_count: u64,
        installs: u64,
        max_installs: u64,
        editor_choice: bool,
    ) -> Self {
        let rating = if rating.is_nan() { 0.0 } else { rating.clamp(0.0, MAX_RATING) };
        Self {
            rating,
            rating_count,
            installs,
            max_installs,
            editor_choice,
        }
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn rating_count(&self) -> u64 {
        self.rating_count
    }

    pub fn installs(&self) -> u64 {
        self.installs
    }

    pub fn max_installs(&self) -> u64 {
        self.max_installs
    }

    pub fn editor_choice(&self) -> bool {
        self.editor_choice
    }

    /// Editor choice as the 0/1 flag the model and the prompt use.
    pub fn editor_choice_flag(&self) -> u8 {
        u8::from(self.editor_choice)
    }

    /// Model input row, in training column order.
    pub fn to_input(&self) -> [f32; 5] {
        [
            self.rating as f32,
            self.rating_count as f32,
            self.installs as f32,
            self.max_installs as f32,
            f32::from(self.editor_choice_flag()),
        ]
    }
}
