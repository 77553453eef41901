//! App name validation and generation

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;

/// Deployable app names: 4-63 characters from `[A-Za-z0-9_-]`
#[allow(clippy::unwrap_used)] // pattern is a literal
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_-]{4,63}$").unwrap());

// Message text matches the server-side rule above.
const NAME_RULE_MESSAGE: &str = "The title must contain 4 - 64 alphanumeric characters.";
const TITLE_TOO_SHORT_MESSAGE: &str = "Enter a title with at least 3 characters.";

/// Minimum trimmed title length before remote name generation is attempted
const MIN_TITLE_CHARS: usize = 3;

/// Outcome of one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidity {
    /// Name accepted; carries the adopted deployable name
    Valid(String),
    /// Name rejected; carries the inline error message
    Invalid(String),
    /// Too early to judge (short title while the field still has focus);
    /// prior validity is left untouched
    Indeterminate,
}

struct NameState {
    current_name: String,
    is_valid: bool,
    error: Option<String>,
}

/// Validates a candidate deployment name, or generates one from a title.
///
/// Two modes, chosen by whether the active account supports titles:
/// - without title support the input *is* the name and is checked locally
///   against the name-character rule;
/// - with title support the trimmed title is sent to the server's
///   "generate app name" operation and its verdict is adopted.
///
/// Every change of validity invokes the registered listener so dependent UI
/// (a Deploy button) can enable or disable itself.
pub struct AppNameValidator {
    ctx: Arc<ServiceContext>,
    supports_title: bool,
    state: RwLock<NameState>,
    validity_listener: Option<Box<dyn Fn(bool) + Send + Sync>>,
}

impl AppNameValidator {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, supports_title: bool) -> Self {
        Self {
            ctx,
            supports_title,
            state: RwLock::new(NameState {
                current_name: String::new(),
                is_valid: true,
                error: None,
            }),
            validity_listener: None,
        }
    }

    /// Register the enable/disable hook fired on every validity change
    #[must_use]
    pub fn with_validity_listener(
        mut self,
        listener: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        self.validity_listener = Some(Box::new(listener));
        self
    }

    /// Validate `input` as typed so far. `has_focus` distinguishes an
    /// in-progress edit from a completed one.
    pub async fn validate(&self, input: &str, has_focus: bool) -> CoreResult<NameValidity> {
        if self.supports_title {
            self.validate_title(input, has_focus).await
        } else {
            Ok(self.validate_name(input).await)
        }
    }

    /// Adopted deployable name
    pub async fn current_name(&self) -> String {
        self.state.read().await.current_name.clone()
    }

    pub async fn is_valid(&self) -> bool {
        self.state.read().await.is_valid
    }

    /// Inline error to show next to the input, when invalid
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    // The input is the name itself; check the character rule locally.
    async fn validate_name(&self, input: &str) -> NameValidity {
        if NAME_PATTERN.is_match(input) {
            self.apply(input.to_string(), true, None).await;
            NameValidity::Valid(input.to_string())
        } else {
            self.apply(input.to_string(), false, Some(NAME_RULE_MESSAGE.to_string()))
                .await;
            NameValidity::Invalid(NAME_RULE_MESSAGE.to_string())
        }
    }

    // The input is a human title; delegate name generation to the server
    // once there is enough of it to work with.
    async fn validate_title(&self, input: &str, has_focus: bool) -> CoreResult<NameValidity> {
        let title = input.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            // Don't nag while the user is still typing.
            if has_focus {
                return Ok(NameValidity::Indeterminate);
            }
            self.apply(String::new(), false, Some(TITLE_TOO_SHORT_MESSAGE.to_string()))
                .await;
            return Ok(NameValidity::Invalid(TITLE_TOO_SHORT_MESSAGE.to_string()));
        }

        match self.ctx.server.generate_app_name(title).await {
            Ok(generated) => {
                let validity = if generated.valid {
                    NameValidity::Valid(generated.name.clone())
                } else {
                    NameValidity::Invalid(
                        generated
                            .error
                            .clone()
                            .unwrap_or_else(|| NAME_RULE_MESSAGE.to_string()),
                    )
                };
                self.apply(generated.name, generated.valid, generated.error)
                    .await;
                Ok(validity)
            }
            Err(e) => {
                log::warn!("App name generation failed: {e}");
                let message = e.to_string();
                self.apply(String::new(), false, Some(message.clone())).await;
                Err(CoreError::ServerError(message))
            }
        }
    }

    async fn apply(&self, name: String, valid: bool, error: Option<String>) {
        let changed = {
            let mut state = self.state.write().await;
            let changed = state.is_valid != valid;
            state.current_name = name;
            state.is_valid = valid;
            state.error = error;
            changed
        };
        if changed {
            if let Some(listener) = &self.validity_listener {
                listener(valid);
            }
        }
    }
}
