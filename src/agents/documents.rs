use super::prompts;
use crate::config::AgentSettings;
use crate::errors::AppError;
use crate::models::agent::AgentKind;
use crate::models::chat::ChatMessage;
use crate::services::extract::{self, ParseError, ParsedDocument};
use crate::services::ModelService;
use crate::store::Thread;
use log::{error, warn};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Value};

/// What to do when the model's reply cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Fail,
    /// Send the malformed JSON back and ask for a fix.
    Repair,
    /// Baseline document on the first turn, current document afterwards.
    Fallback,
}

pub struct DocumentProfile {
    pub kind: AgentKind,
    pub noun: &'static str,
    pub document_key: &'static str,
    pub initial_key: &'static str,
    pub context_title: &'static str,
    pub label: Option<&'static str>,
    pub recovery: Recovery,
    pub initial_system: &'static str,
    pub update_system: &'static str,
    pub initial_request: &'static str,
    pub update_instruction: &'static str,
    pub generated: &'static str,
    pub updated: &'static str,
}

pub static FUNCTIONAL: DocumentProfile = DocumentProfile {
    kind: AgentKind::Functional,
    noun: "functional requirements",
    document_key: "functional_requirements",
    initial_key: "is_initial_analysis",
    context_title: "FUNCTIONAL REQUIREMENTS",
    label: None,
    recovery: Recovery::Repair,
    initial_system: prompts::FUNCTIONAL_INITIAL,
    update_system: prompts::FUNCTIONAL_UPDATE,
    initial_request: "Analyze this project and create comprehensive functional requirements:",
    update_instruction: "Update the functional requirements based on this new input.",
    generated: "Functional requirements generated successfully.",
    updated: "Functional requirements updated successfully.",
};

pub static NON_FUNCTIONAL: DocumentProfile = DocumentProfile {
    kind: AgentKind::NonFunctional,
    noun: "non-functional requirements",
    document_key: "non_functional_requirements",
    initial_key: "is_initial_analysis",
    context_title: "NON-FUNCTIONAL REQUIREMENTS",
    label: None,
    recovery: Recovery::Fallback,
    initial_system: prompts::NON_FUNCTIONAL_INITIAL,
    update_system: prompts::NON_FUNCTIONAL_UPDATE,
    initial_request: "Analyze this project and create comprehensive non-functional requirements:",
    update_instruction: "Update the non-functional requirements based on this new input.",
    generated: "Non-functional requirements generated successfully!",
    updated: "Non-functional requirements updated successfully!",
};

pub static DEVELOPMENT: DocumentProfile = DocumentProfile {
    kind: AgentKind::Development,
    noun: "project plan",
    document_key: "project_plan",
    initial_key: "is_initial_plan",
    context_title: "PROJECT PLAN",
    label: Some("PROJECT_PLAN"),
    recovery: Recovery::Fail,
    initial_system: prompts::DEVELOPMENT_INITIAL,
    update_system: prompts::DEVELOPMENT_UPDATE,
    initial_request: "Create a comprehensive project plan for this idea:",
    update_instruction: "Update the project plan based on this new requirement.",
    generated: "Project plan generated successfully!",
    updated: "Project plan updated successfully!",
};

pub static VALIDATOR: DocumentProfile = DocumentProfile {
    kind: AgentKind::Validator,
    noun: "validation report",
    document_key: "validation_report",
    initial_key: "is_initial_validation",
    context_title: "VALIDATION REPORT",
    label: Some("VALIDATION_REPORT"),
    recovery: Recovery::Fail,
    initial_system: prompts::VALIDATOR_INITIAL,
    update_system: prompts::VALIDATOR_UPDATE,
    initial_request: "Create a comprehensive project validation report for this idea:",
    update_instruction: "Update the validation report based on this new information or requirement.",
    generated: "Validation report generated successfully!",
    updated: "Validation report updated successfully!",
};

pub fn profile(kind: AgentKind) -> Option<&'static DocumentProfile> {
    match kind {
        AgentKind::Functional => Some(&FUNCTIONAL),
        AgentKind::NonFunctional => Some(&NON_FUNCTIONAL),
        AgentKind::Development => Some(&DEVELOPMENT),
        AgentKind::Validator => Some(&VALIDATOR),
        AgentKind::Business => None,
    }
}

/// Baseline NFRs used when the first reply cannot be parsed.
fn baseline_non_functional() -> Value {
    json!({
        "performance_requirements": {
            "specific_metrics": ["Response time under 2 seconds", "Support 1000 concurrent users"],
            "testing_criteria": ["Load testing", "Performance monitoring"],
            "constraints": ["Hardware limitations"],
            "priority_level": "High"
        },
        "security_requirements": {
            "specific_metrics": ["Data encryption", "User authentication"],
            "testing_criteria": ["Security audit", "Penetration testing"],
            "constraints": ["Compliance requirements"],
            "priority_level": "Critical"
        }
    })
}

#[derive(Debug)]
pub struct DocumentReply {
    pub profile: &'static DocumentProfile,
    pub response: String,
    pub document: Value,
    pub initial: bool,
}

impl Serialize for DocumentReply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("response", &self.response)?;
        map.serialize_entry(self.profile.document_key, &self.document)?;
        map.serialize_entry(self.profile.initial_key, &self.initial)?;
        map.end()
    }
}

impl std::fmt::Debug for DocumentProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProfile")
            .field("kind", &self.kind)
            .field("recovery", &self.recovery)
            .finish()
    }
}

pub fn history(profile: &DocumentProfile, thread: &Thread) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("conversation_history".into(), json!(thread.messages));
    body.insert(
        format!("current_{}", profile.document_key),
        thread.document.clone().unwrap_or(Value::Null),
    );
    body.insert("message_count".into(), json!(thread.messages.len()));
    Value::Object(body)
}

pub async fn turn(
    model: &ModelService,
    settings: &AgentSettings,
    profile: &'static DocumentProfile,
    thread: &mut Thread,
    message: &str,
) -> Result<DocumentReply, AppError> {
    let initial = thread.is_empty();

    let outcome = if initial {
        let prompt = format!("{} {}", profile.initial_request, message);
        request(model, settings, profile, profile.initial_system, prompt, None).await
    } else {
        match thread.document.clone() {
            Some(current) => {
                let prompt = prompts::update_context(
                    profile.context_title,
                    &current,
                    thread.recent(settings.history_window),
                    message,
                    profile.update_instruction,
                );
                request(model, settings, profile, profile.update_system, prompt, Some(current)).await
            }
            None => Err(AppError::BadRequest(format!(
                "No existing {} found",
                profile.noun
            ))),
        }
    };

    let (document, response) = outcome?;
    thread.push(ChatMessage::user(message));
    thread.push(ChatMessage::assistant(response.as_str()));
    thread.set_output(response.as_str());
    thread.set_document(document.clone());

    Ok(DocumentReply {
        profile,
        response,
        document,
        initial,
    })
}

async fn request(
    model: &ModelService,
    settings: &AgentSettings,
    profile: &'static DocumentProfile,
    system: &str,
    mut prompt: String,
    current: Option<Value>,
) -> Result<(Value, String), AppError> {
    let action = if current.is_some() { "update" } else { "generate" };
    let default_message = if current.is_some() {
        profile.updated
    } else {
        profile.generated
    };
    let attempts = match profile.recovery {
        Recovery::Repair => settings.repair_attempts.max(1),
        _ => 1,
    };

    for attempt in 1..=attempts {
        let text = model
            .generate(&prompts::compose(system, &prompt))
            .await
            .map_err(|e| {
                error!("{} model call failed: {}", profile.kind.key(), e);
                AppError::model(format!("Failed to {} {}", action, profile.noun), e)
            })?;

        match extract::parse_document(&text, profile.label) {
            Ok(ParsedDocument { document, message }) => {
                let message = match profile.recovery {
                    // NFR replies carry no summary section
                    Recovery::Fallback => default_message.to_string(),
                    _ => message.unwrap_or_else(|| default_message.to_string()),
                };
                return Ok((document, message));
            }
            Err(ParseError::Malformed { fragment, source })
                if profile.recovery == Recovery::Repair && attempt < attempts =>
            {
                warn!(
                    "attempt {}/{}: malformed {} JSON, asking for a fix: {}",
                    attempt, attempts, profile.noun, source
                );
                prompt = prompts::repair(&fragment);
            }
            Err(e) if profile.recovery == Recovery::Fallback => {
                error!("{} reply could not be parsed: {}", profile.kind.key(), e);
                return Ok(match current {
                    Some(current) => (
                        current,
                        format!("Update failed due to JSON parsing error: {}", e),
                    ),
                    None => (
                        baseline_non_functional(),
                        format!("Generated basic requirements (JSON parsing issue: {})", e),
                    ),
                });
            }
            Err(e) => {
                error!("{} reply could not be parsed: {}", profile.kind.key(), e);
                // only malformed JSON is retried; a reply with no object fails at once
                let context = match (&e, profile.recovery) {
                    (ParseError::Malformed { .. }, Recovery::Repair) => format!(
                        "Failed to {} valid {} after {} attempts",
                        action, profile.noun, attempts
                    ),
                    _ => format!("Failed to {} {}", action, profile.noun),
                };
                return Err(AppError::parse(context, e));
            }
        }
    }

    // the final attempt always returns from inside the loop
    Err(AppError::parse(
        format!("Failed to {} {}", action, profile.noun),
        ParseError::NoJson,
    ))
}
